//! Code for mapping variants between coordinate systems.

use std::sync::Arc;

use biocommons_bioutils::assemblies::Assembly;
use serde::{Deserialize, Serialize};

use crate::{
    data::interface::Provider,
    mapper::{
        alignment::{Config as AlignmentConfig, TranscriptMapper},
        altseq::{AltSeqBuilder, RefTranscriptData},
        altseq_to_hgvsp::AltSeqToHgvsp,
        cache::MapperCache,
        edit::convert_edit_check_strand,
        Error,
    },
    variant::{
        Accession, CdsLocEdit, GeneSymbol, GenomeLocEdit, HgvsVariant, Mu, NaEdit, RnaLocEdit,
        VariantType,
    },
};

/// Configuration for Mapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The assembly that genome variants are placed on.
    #[serde(with = "assembly_name")]
    pub assembly: Assembly,
    /// Keep built `TranscriptMapper`s for reuse.
    pub cache_transcripts: bool,
    /// Require positions to be within the transcript's alignment.
    pub strict_bounds: bool,
    /// Fill in the gene symbol of the transcript where the variant has none.
    pub add_gene_symbol: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assembly: Assembly::Grch37p10,
            cache_transcripts: true,
            strict_bounds: true,
            add_gene_symbol: false,
        }
    }
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        assembly_name::name(self.assembly) == assembly_name::name(other.assembly)
            && self.cache_transcripts == other.cache_transcripts
            && self.strict_bounds == other.strict_bounds
            && self.add_gene_symbol == other.add_gene_symbol
    }
}

/// (De-)serialization of `Assembly` by its name, e.g., `"GRCh37.p10"`.
mod assembly_name {
    use biocommons_bioutils::assemblies::Assembly;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn name(assembly: Assembly) -> &'static str {
        match assembly {
            Assembly::Grch37 => "GRCh37",
            Assembly::Grch37p10 => "GRCh37.p10",
            Assembly::Grch38 => "GRCh38",
        }
    }

    pub fn serialize<S>(assembly: &Assembly, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(name(*assembly))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Assembly, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        match value.to_ascii_lowercase().as_str() {
            "grch37" => Ok(Assembly::Grch37),
            "grch37.p10" | "grch37p10" => Ok(Assembly::Grch37p10),
            "grch38" => Ok(Assembly::Grch38),
            _ => Err(serde::de::Error::custom(format!(
                "unknown assembly {value:?}, expected one of GRCh37, GRCh37.p10, GRCh38"
            ))),
        }
    }
}

/// Projects variants between `g.`, `r.`, and `c.` and derives `p.` consequences.
///
/// ```text
/// g ----acgtatgcac--gtctagacgt----      ----acgtatgcac--gtctagacgt----
///         \         \/         /              \         \/         /
/// c      acgtATGCACGTCTAGacgt         r      acgtatgcacgtctagacgt
///            1                               1
/// p          MetHisValTer
/// ```
///
/// All conversions go through the `TranscriptMapper` of the transcript, which is built
/// once per accession and kept in the cache if enabled.  Only substitution and
/// deletion-insertion edits (`NaEdit::RefAlt`) are mapped; other edits are rejected
/// before any data is looked up.
pub struct Mapper {
    config: Config,
    provider: Arc<dyn Provider + Send + Sync>,
    cache: MapperCache,
}

fn invalid_variant(expected: VariantType, var: &HgvsVariant) -> Error {
    Error::InvalidHgvsVariant {
        expected,
        actual: var.variant_type(),
        variant: var.to_string(),
    }
}

/// Reject every edit except `RefAlt`.
fn check_edit(edit: &Mu<NaEdit>, conversion: &str) -> Result<(), Error> {
    match edit.inner() {
        NaEdit::RefAlt { .. } => Ok(()),
        NaEdit::Del { .. }
        | NaEdit::Ins { .. }
        | NaEdit::Dup { .. }
        | NaEdit::Repeat { .. } => Err(Error::UnsupportedEditType {
            edit: edit.to_string(),
            conversion: conversion.to_string(),
        }),
    }
}

/// The mapped location is only certain if the input location was.
fn with_certainty<T>(mapped: Mu<T>, is_certain: bool) -> Mu<T> {
    let is_certain = is_certain && mapped.is_certain();
    Mu::from(mapped.into_inner(), is_certain)
}

impl Mapper {
    pub fn new(config: &Config, provider: Arc<dyn Provider + Send + Sync>) -> Mapper {
        Mapper {
            config: config.clone(),
            provider,
            cache: MapperCache::new(config.cache_transcripts),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Return a copy of the internal provider.
    pub fn provider(&self) -> Arc<dyn Provider + Send + Sync> {
        self.provider.clone()
    }

    pub fn cache(&self) -> &MapperCache {
        &self.cache
    }

    /// Obtain the `TranscriptMapper` for `tx_ac`, from the cache if possible.
    pub fn transcript_mapper(&self, tx_ac: &str) -> Result<Arc<TranscriptMapper>, Error> {
        self.cache.get_or_build(tx_ac, || {
            TranscriptMapper::new(
                &AlignmentConfig {
                    strict_bounds: self.config.strict_bounds,
                },
                self.provider.as_ref(),
                tx_ac,
                self.config.assembly,
            )
        })
    }

    fn fetch_gene_symbol(
        &self,
        mapper: &TranscriptMapper,
        gene_symbol: &Option<GeneSymbol>,
    ) -> Option<GeneSymbol> {
        match gene_symbol {
            Some(gene_symbol) => Some(gene_symbol.clone()),
            None if self.config.add_gene_symbol && !mapper.hgnc().is_empty() => {
                Some(GeneSymbol::new(mapper.hgnc()))
            }
            None => None,
        }
    }

    /// Accession of the genomic sequence for the transcript's chromosome.
    fn genome_accession(&self, mapper: &TranscriptMapper) -> Result<String, Error> {
        Ok(self
            .provider
            .chr_to_ac(mapper.chromosome(), self.config.assembly)?)
    }

    /// Make sure that the variant's sequence is the one the transcript is aligned to.
    ///
    /// Chromosome names such as `"7"` or `"chr7"` are accepted as well.
    fn check_genome_accession(
        &self,
        mapper: &TranscriptMapper,
        accession: &Accession,
    ) -> Result<(), Error> {
        let matches = accession.value == mapper.alt_ac()
            || self
                .provider
                .chr_to_ac(&accession.value, self.config.assembly)
                .is_ok_and(|ac| ac == mapper.alt_ac());
        if matches {
            Ok(())
        } else {
            Err(Error::GenomeAccessionMismatch {
                tx_ac: mapper.tx_ac().to_string(),
                alt_ac: mapper.alt_ac().to_string(),
                ac: accession.value.clone(),
            })
        }
    }

    /// Convert from genome (g.) variant to CDS variant (c.).
    ///
    /// # Args
    ///
    /// * `var_g` -- `HgvsVariant::GenomeVariant` to project
    /// * `tx_ac` -- accession of transcript to project to
    pub fn g_to_c(&self, var_g: &HgvsVariant, tx_ac: &str) -> Result<HgvsVariant, Error> {
        log::debug!("g_to_c({}, {})", var_g, tx_ac);
        let HgvsVariant::GenomeVariant {
            accession,
            gene_symbol,
            loc_edit,
        } = var_g
        else {
            return Err(invalid_variant(VariantType::Genome, var_g));
        };
        check_edit(&loc_edit.edit, "g_to_c")?;

        let mapper = self.transcript_mapper(tx_ac)?;
        self.check_genome_accession(&mapper, accession)?;
        let pos_c = mapper.g_to_c(loc_edit.loc.inner())?;
        let edit_c = convert_edit_check_strand(mapper.strand(), &loc_edit.edit)?;

        Ok(HgvsVariant::CdsVariant {
            accession: Accession::new(tx_ac),
            gene_symbol: self.fetch_gene_symbol(&mapper, gene_symbol),
            loc_edit: CdsLocEdit {
                loc: with_certainty(pos_c, loc_edit.loc.is_certain()),
                edit: edit_c,
            },
        })
    }

    /// Convert from genome (g.) variant to transcript variant (r.).
    ///
    /// # Args
    ///
    /// * `var_g` -- `HgvsVariant::GenomeVariant` to project
    /// * `tx_ac` -- accession of transcript to project to
    pub fn g_to_r(&self, var_g: &HgvsVariant, tx_ac: &str) -> Result<HgvsVariant, Error> {
        log::debug!("g_to_r({}, {})", var_g, tx_ac);
        let HgvsVariant::GenomeVariant {
            accession,
            gene_symbol,
            loc_edit,
        } = var_g
        else {
            return Err(invalid_variant(VariantType::Genome, var_g));
        };
        check_edit(&loc_edit.edit, "g_to_r")?;

        let mapper = self.transcript_mapper(tx_ac)?;
        self.check_genome_accession(&mapper, accession)?;
        let pos_r = mapper.g_to_r(loc_edit.loc.inner())?;
        let edit_r = convert_edit_check_strand(mapper.strand(), &loc_edit.edit)?;

        Ok(HgvsVariant::RnaVariant {
            accession: Accession::new(tx_ac),
            gene_symbol: self.fetch_gene_symbol(&mapper, gene_symbol),
            loc_edit: RnaLocEdit {
                loc: with_certainty(pos_r, loc_edit.loc.is_certain()),
                edit: edit_r,
            },
        })
    }

    /// Convert from transcript variant (r.) to genome variant (g.).
    ///
    /// The genome accession is derived from the transcript's chromosome.
    pub fn r_to_g(&self, var_r: &HgvsVariant) -> Result<HgvsVariant, Error> {
        log::debug!("r_to_g({})", var_r);
        let HgvsVariant::RnaVariant {
            accession,
            gene_symbol,
            loc_edit,
        } = var_r
        else {
            return Err(invalid_variant(VariantType::Rna, var_r));
        };
        check_edit(&loc_edit.edit, "r_to_g")?;

        let mapper = self.transcript_mapper(&accession.value)?;
        let pos_g = mapper.r_to_g(loc_edit.loc.inner())?;
        let edit_g = convert_edit_check_strand(mapper.strand(), &loc_edit.edit)?;

        Ok(HgvsVariant::GenomeVariant {
            accession: Accession::new(&self.genome_accession(&mapper)?),
            gene_symbol: self.fetch_gene_symbol(&mapper, gene_symbol),
            loc_edit: GenomeLocEdit {
                loc: with_certainty(pos_g, loc_edit.loc.is_certain()),
                edit: edit_g,
            },
        })
    }

    /// Convert from CDS variant (c.) to genome variant (g.).
    ///
    /// The genome accession is derived from the transcript's chromosome.
    pub fn c_to_g(&self, var_c: &HgvsVariant) -> Result<HgvsVariant, Error> {
        log::debug!("c_to_g({})", var_c);
        let HgvsVariant::CdsVariant {
            accession,
            gene_symbol,
            loc_edit,
        } = var_c
        else {
            return Err(invalid_variant(VariantType::Cds, var_c));
        };
        check_edit(&loc_edit.edit, "c_to_g")?;

        let mapper = self.transcript_mapper(&accession.value)?;
        let pos_g = mapper.c_to_g(loc_edit.loc.inner())?;
        let edit_g = convert_edit_check_strand(mapper.strand(), &loc_edit.edit)?;

        Ok(HgvsVariant::GenomeVariant {
            accession: Accession::new(&self.genome_accession(&mapper)?),
            gene_symbol: self.fetch_gene_symbol(&mapper, gene_symbol),
            loc_edit: GenomeLocEdit {
                loc: with_certainty(pos_g, loc_edit.loc.is_certain()),
                edit: edit_g,
            },
        })
    }

    /// Convert from CDS variant (c.) to transcript variant (r.) on the same transcript.
    pub fn c_to_r(&self, var_c: &HgvsVariant) -> Result<HgvsVariant, Error> {
        log::debug!("c_to_r({})", var_c);
        let HgvsVariant::CdsVariant {
            accession,
            gene_symbol,
            loc_edit,
        } = var_c
        else {
            return Err(invalid_variant(VariantType::Cds, var_c));
        };
        check_edit(&loc_edit.edit, "c_to_r")?;

        let mapper = self.transcript_mapper(&accession.value)?;
        let pos_r = mapper.c_to_r(loc_edit.loc.inner())?;

        Ok(HgvsVariant::RnaVariant {
            accession: accession.clone(),
            gene_symbol: self.fetch_gene_symbol(&mapper, gene_symbol),
            loc_edit: RnaLocEdit {
                loc: Mu::from(pos_r, loc_edit.loc.is_certain()),
                edit: loc_edit.edit.clone(),
            },
        })
    }

    /// Convert from transcript variant (r.) to CDS variant (c.) on the same transcript.
    pub fn r_to_c(&self, var_r: &HgvsVariant) -> Result<HgvsVariant, Error> {
        log::debug!("r_to_c({})", var_r);
        let HgvsVariant::RnaVariant {
            accession,
            gene_symbol,
            loc_edit,
        } = var_r
        else {
            return Err(invalid_variant(VariantType::Rna, var_r));
        };
        check_edit(&loc_edit.edit, "r_to_c")?;

        let mapper = self.transcript_mapper(&accession.value)?;
        let pos_c = mapper.r_to_c(loc_edit.loc.inner())?;

        Ok(HgvsVariant::CdsVariant {
            accession: accession.clone(),
            gene_symbol: self.fetch_gene_symbol(&mapper, gene_symbol),
            loc_edit: CdsLocEdit {
                loc: Mu::from(pos_c, loc_edit.loc.is_certain()),
                edit: loc_edit.edit.clone(),
            },
        })
    }

    /// Convert from CDS variant (c.) to protein variant (p.).
    ///
    /// # Args
    ///
    /// * `var_c` -- `HgvsVariant::CdsVariant` to project
    /// * `pro_ac` -- Protein accession, looked up or derived from the sequence if `None`
    pub fn c_to_p(&self, var_c: &HgvsVariant, pro_ac: Option<&str>) -> Result<HgvsVariant, Error> {
        log::debug!("c_to_p({})", var_c);
        let HgvsVariant::CdsVariant {
            accession,
            gene_symbol,
            loc_edit,
        } = var_c
        else {
            return Err(invalid_variant(VariantType::Cds, var_c));
        };
        check_edit(&loc_edit.edit, "c_to_p")?;

        let reference_data = RefTranscriptData::new(
            self.provider.as_ref(),
            accession,
            pro_ac,
            self.config.assembly,
        )?;
        let builder = AltSeqBuilder::new(loc_edit, &reference_data);

        // Each alternative sequence yields one candidate; the first one is reported.
        let var_ps = builder
            .build_altseq()?
            .iter()
            .map(|alt_data| AltSeqToHgvsp::new(&reference_data, alt_data).build_hgvsp())
            .collect::<Result<Vec<_>, Error>>()?;
        let var_p = var_ps
            .into_iter()
            .next()
            .ok_or_else(|| Error::ProtVariantConstructionFailed(var_c.to_string()))?;

        let gene_symbol = if gene_symbol.is_none() && self.config.add_gene_symbol {
            let mapper = self.transcript_mapper(accession)?;
            self.fetch_gene_symbol(&mapper, gene_symbol)
        } else {
            gene_symbol.clone()
        };
        Ok(var_p.with_gene_symbol(gene_symbol))
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
