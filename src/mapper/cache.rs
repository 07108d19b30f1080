//! Memoization of `TranscriptMapper` instances by transcript accession.

use std::sync::{Arc, Mutex, MutexGuard};

use ahash::AHashMap;

use crate::mapper::{alignment::TranscriptMapper, Error};

/// Cache of transcript mappers, owned by one `mapper::variant::Mapper`.
///
/// Entries are never evicted.  When disabled, every lookup builds a fresh mapper.
#[derive(Debug, Default)]
pub struct MapperCache {
    enabled: bool,
    mappers: Mutex<AHashMap<String, Arc<TranscriptMapper>>>,
}

impl MapperCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            mappers: Mutex::new(AHashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of cached mappers.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave the map half-updated.
    fn lock(&self) -> MutexGuard<'_, AHashMap<String, Arc<TranscriptMapper>>> {
        self.mappers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the mapper for `tx_ac`, calling `build` on a miss.
    ///
    /// The lock is not held while building.  If two callers race on the same accession,
    /// the first insert wins and both receive that instance.
    pub fn get_or_build<F>(&self, tx_ac: &str, build: F) -> Result<Arc<TranscriptMapper>, Error>
    where
        F: FnOnce() -> Result<TranscriptMapper, Error>,
    {
        if !self.enabled {
            return Ok(Arc::new(build()?));
        }

        if let Some(mapper) = self.lock().get(tx_ac) {
            log::debug!("mapper cache hit for {}", tx_ac);
            return Ok(mapper.clone());
        }

        log::debug!("mapper cache miss for {}", tx_ac);
        let mapper = Arc::new(build()?);
        Ok(self
            .lock()
            .entry(tx_ac.to_string())
            .or_insert(mapper)
            .clone())
    }
}

#[cfg(test)]
mod test {
    use std::{cell::Cell, sync::Arc};

    use biocommons_bioutils::assemblies::Assembly;
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::MapperCache;
    use crate::{
        data::json::{test_helpers::build_provider, Provider},
        mapper::{alignment::TranscriptMapper, Error},
    };

    fn build(provider: &Provider, tx_ac: &str) -> Result<TranscriptMapper, Error> {
        TranscriptMapper::new(&Default::default(), provider, tx_ac, Assembly::Grch37p10)
    }

    #[test]
    fn enabled_reuses_instance() -> Result<(), Error> {
        let provider = build_provider()?;
        let cache = MapperCache::new(true);
        let builds = Cell::new(0);
        let counting = |tx_ac: &str| {
            builds.set(builds.get() + 1);
            build(&provider, tx_ac)
        };

        let first = cache.get_or_build("NM_TEST.1", || counting("NM_TEST.1"))?;
        let second = cache.get_or_build("NM_TEST.1", || counting("NM_TEST.1"))?;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builds.get(), 1);

        let other = cache.get_or_build("NM_001637.3", || counting("NM_001637.3"))?;
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(builds.get(), 2);
        assert_eq!(cache.len(), 2);

        Ok(())
    }

    #[test]
    fn disabled_builds_every_time() -> Result<(), Error> {
        let provider = build_provider()?;
        let cache = MapperCache::new(false);
        let builds = Cell::new(0);
        let counting = || {
            builds.set(builds.get() + 1);
            build(&provider, "NM_TEST.1")
        };

        let first = cache.get_or_build("NM_TEST.1", counting)?;
        let second = cache.get_or_build("NM_TEST.1", counting)?;
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(builds.get(), 2);
        assert!(cache.is_empty());
        assert!(!cache.is_enabled());

        Ok(())
    }

    #[test]
    fn failed_build_is_not_cached() -> Result<(), Error> {
        let provider = build_provider()?;
        let cache = MapperCache::new(true);

        assert!(cache
            .get_or_build("NM_UNKNOWN.1", || build(&provider, "NM_UNKNOWN.1"))
            .is_err());
        assert!(cache.is_empty());

        Ok(())
    }

    #[test]
    fn shared_between_threads() -> Result<(), Error> {
        let provider = Arc::new(build_provider()?);
        let cache = Arc::new(MapperCache::new(true));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let provider = provider.clone();
                let cache = cache.clone();
                std::thread::spawn(move || {
                    cache.get_or_build("NM_TEST.1", || build(&provider, "NM_TEST.1"))
                })
            })
            .collect();
        let mappers = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread panicked"))
            .collect::<Result<Vec<_>, _>>()?;

        let cached = cache.get_or_build("NM_TEST.1", || build(&provider, "NM_TEST.1"))?;
        assert!(mappers.iter().all(|mapper| mapper.tx_ac() == "NM_TEST.1"));
        assert!(mappers.iter().any(|mapper| Arc::ptr_eq(mapper, &cached)));
        assert_eq!(cache.len(), 1);

        Ok(())
    }
}

// <LICENSE>
// Copyright 2023 hgvs-rs Contributors
// Copyright 2014 Bioutils Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
// </LICENSE>
