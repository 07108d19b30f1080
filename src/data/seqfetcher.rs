//! Fetching of (partial) sequences from a SeqRepo, remote REST services, or a FASTA file.

use std::{collections::HashMap, path::PathBuf, sync::Arc, time::Instant};

use bio::io::fasta;
use serde::{Deserialize, Serialize};

use crate::data::error::Error;

/// Default base URL of the NCBI E-utilities `efetch` endpoint.
pub static NCBI_EFETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";

/// Default base URL of the Ensembl REST API.
pub static ENSEMBL_REST_URL: &str = "https://rest.ensembl.org";

/// Where sequences come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Backend {
    /// Path to the seqrepo directory, e.g., `/usr/local/share/seqrepo/latest`.  The last path
    /// component is the "instance" name.
    SeqRepo { path: String },
    /// NCBI for RefSeq accessions, Ensembl for `ENS*` accessions.
    Remote {
        ncbi_url: String,
        ensembl_url: String,
    },
    /// A (small) FASTA file that is loaded into memory.
    Fasta { path: String },
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Remote {
            ncbi_url: NCBI_EFETCH_URL.to_string(),
            ensembl_url: ENSEMBL_REST_URL.to_string(),
        }
    }
}

/// Configuration for the `SeqFetcher`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    pub backend: Backend,
}

enum Source {
    SeqRepo(Arc<dyn seqrepo::Interface + Sync + Send>),
    Remote {
        ncbi_url: String,
        ensembl_url: String,
    },
    Fasta(HashMap<String, String>),
}

/// Fetches sequences from the backend selected at construction.
pub struct SeqFetcher {
    source: Source,
}

fn unavailable<E: std::fmt::Display>(ac: &str) -> impl FnOnce(E) -> Error + '_ {
    move |e| Error::SequenceUnavailable {
        ac: ac.to_string(),
        cause: e.to_string(),
    }
}

impl SeqFetcher {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let source = match &config.backend {
            Backend::SeqRepo { path } => {
                log::info!("Using seqrepo at {} for sequences", path);
                let seqrepo = PathBuf::from(path);
                let parent = seqrepo
                    .parent()
                    .and_then(|p| p.to_str())
                    .ok_or_else(|| Error::PathParent(path.clone()))?;
                let instance = seqrepo
                    .file_name()
                    .and_then(|p| p.to_str())
                    .ok_or_else(|| Error::PathBasename(path.clone()))?;
                let seqrepo = seqrepo::SeqRepo::new(parent, instance).map_err(unavailable(path))?;
                Source::SeqRepo(Arc::new(seqrepo))
            }
            Backend::Remote {
                ncbi_url,
                ensembl_url,
            } => {
                log::info!(
                    "Using remote sequences from {} and {}",
                    ncbi_url,
                    ensembl_url
                );
                Source::Remote {
                    ncbi_url: ncbi_url.clone(),
                    ensembl_url: ensembl_url.clone(),
                }
            }
            Backend::Fasta { path } => {
                log::info!("Using sequences from FASTA file {}", path);
                Source::Fasta(Self::load_fasta(path)?)
            }
        };

        Ok(Self { source })
    }

    /// Create a fetcher allowing to inject a seqrepo.
    pub fn with_seqrepo(seqrepo: Arc<dyn seqrepo::Interface + Sync + Send>) -> Self {
        Self {
            source: Source::SeqRepo(seqrepo),
        }
    }

    fn load_fasta(path: &str) -> Result<HashMap<String, String>, Error> {
        let start = Instant::now();
        let reader =
            fasta::Reader::from_file(path).map_err(|e| Error::FastaRead(path.into(), e.to_string()))?;

        let mut result = HashMap::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::FastaRead(path.into(), e.to_string()))?;
            let seq = String::from_utf8(record.seq().to_vec())
                .map_err(|e| Error::FastaRead(path.into(), e.to_string()))?;
            result.insert(record.id().to_string(), seq);
        }
        log::debug!(
            "loaded {} sequences from {} in {:?}",
            result.len(),
            path,
            start.elapsed()
        );

        Ok(result)
    }

    /// Fetch the sequence of `ac`, limited to 0-based, right-open `[begin, end)` if given.
    pub fn fetch_seq(
        &self,
        ac: &str,
        begin: Option<usize>,
        end: Option<usize>,
    ) -> Result<String, Error> {
        match &self.source {
            Source::SeqRepo(seqrepo) => seqrepo
                .fetch_sequence_part(
                    &seqrepo::AliasOrSeqId::Alias {
                        value: ac.to_string(),
                        namespace: None,
                    },
                    begin,
                    end,
                )
                .map_err(unavailable(ac)),
            Source::Remote {
                ncbi_url,
                ensembl_url,
            } => {
                if ac.starts_with("ENS") {
                    let url = format!(
                        "{}/sequence/id/{}?type=cdna;content-type=text/plain",
                        ensembl_url.trim_end_matches('/'),
                        ac.split('.').next().unwrap_or(ac)
                    );
                    slice_seq(ac, &fetch_remote(ac, &url)?, begin, end)
                } else if let (Some(begin), Some(end)) = (begin, end) {
                    if begin >= end {
                        return Ok(String::new());
                    }
                    let url = format!(
                        "{ncbi_url}?db=nuccore&id={ac}&rettype=fasta&retmode=text\
                         &seq_start={}&seq_stop={end}",
                        begin + 1
                    );
                    fetch_remote(ac, &url)
                } else {
                    let url = format!("{ncbi_url}?db=nuccore&id={ac}&rettype=fasta&retmode=text");
                    slice_seq(ac, &fetch_remote(ac, &url)?, begin, end)
                }
            }
            Source::Fasta(seqs) => {
                let seq = seqs.get(ac).ok_or_else(|| Error::SequenceUnavailable {
                    ac: ac.to_string(),
                    cause: "accession not in FASTA file".to_string(),
                })?;
                slice_seq(ac, seq, begin, end)
            }
        }
    }
}

/// Fetch `url` and return the sequence from the FASTA or plain text body.
fn fetch_remote(ac: &str, url: &str) -> Result<String, Error> {
    log::debug!("fetching {} from {}", ac, url);
    let body = ureq::get(url)
        .call()
        .map_err(unavailable(ac))?
        .into_string()
        .map_err(unavailable(ac))?;

    let seq: String = body
        .lines()
        .filter(|line| !line.starts_with('>'))
        .map(str::trim)
        .collect();
    if seq.is_empty() {
        Err(Error::SequenceUnavailable {
            ac: ac.to_string(),
            cause: "empty response".to_string(),
        })
    } else {
        Ok(seq)
    }
}

fn slice_seq(
    ac: &str,
    seq: &str,
    begin: Option<usize>,
    end: Option<usize>,
) -> Result<String, Error> {
    let begin = begin.unwrap_or(0);
    let end = end.unwrap_or(seq.len()).min(seq.len());
    if begin > end {
        return if begin > seq.len() {
            Err(Error::SequenceUnavailable {
                ac: ac.to_string(),
                cause: format!("start {begin} beyond sequence length {}", seq.len()),
            })
        } else {
            Ok(String::new())
        };
    }
    seq.get(begin..end)
        .map(str::to_string)
        .ok_or_else(|| Error::SequenceUnavailable {
            ac: ac.to_string(),
            cause: format!("invalid range {begin}..{end}"),
        })
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
