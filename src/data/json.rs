//! Access to `cdot` transcripts from local JSON files with sequences from a `SeqFetcher`.
//!
//! https://github.com/SACGF/cdot

use std::{collections::HashMap, time::Instant};

use biocommons_bioutils::assemblies::Assembly;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data::{
    error::Error,
    interface::{self, TxExonsRecord, TxInfoRecord},
    seqfetcher::{self, SeqFetcher},
};

/// Configuration for the `data::json::Provider`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Paths to the JSON files to load, gzip-ed if ending in `.gz`.
    pub json_paths: Vec<String>,
    /// Where to get sequences from.
    pub seqfetcher: seqfetcher::Config,
}

/// This provider provides transcripts from cdot JSON files and sequences from a `SeqFetcher`.
pub struct Provider {
    inner: TxProvider,
    seqfetcher: SeqFetcher,
}

impl Provider {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            inner: TxProvider::with_paths(&config.json_paths)?,
            seqfetcher: SeqFetcher::new(&config.seqfetcher)?,
        })
    }

    /// Create a new provider allowing to inject the sequence fetcher.
    pub fn with_seqfetcher(json_paths: &[String], seqfetcher: SeqFetcher) -> Result<Self, Error> {
        Ok(Self {
            inner: TxProvider::with_paths(json_paths)?,
            seqfetcher,
        })
    }
}

impl interface::Provider for Provider {
    fn data_version(&self) -> &str {
        &self.inner.data_version
    }

    fn get_tx_info(&self, tx_ac: &str, assembly: Assembly) -> Result<TxInfoRecord, Error> {
        let assembly_map = interface::Provider::get_assembly_map(self, assembly);
        self.inner.get_tx_info(tx_ac, assembly, &assembly_map)
    }

    fn get_tx_exons(&self, tx_ac: &str, assembly: Assembly) -> Result<Vec<TxExonsRecord>, Error> {
        self.inner.get_tx_exons(tx_ac, assembly)
    }

    fn get_seq_part(
        &self,
        ac: &str,
        begin: Option<usize>,
        end: Option<usize>,
    ) -> Result<String, Error> {
        self.seqfetcher.fetch_seq(ac, begin, end)
    }

    fn get_pro_ac_for_tx_ac(&self, tx_ac: &str) -> Result<Option<String>, Error> {
        Ok(self.inner.transcript(tx_ac)?.protein.clone())
    }
}

/// Data structures used for deserializing from cdot.
pub mod models {
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serialize};

    /// Container for a cDot data file.
    #[derive(Deserialize, Serialize, Debug, Clone)]
    pub struct Container {
        pub transcripts: IndexMap<String, Transcript>,
        pub cdot_version: String,
        #[serde(default)]
        pub genome_builds: Vec<String>,
    }

    /// Enum for representing the tags for transcripts.
    #[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum Tag {
        Basic,
        EnsemblCanonical,
        ManeSelect,
        ManePlusClinical,
        RefSeqSelect,
        GencodePrimary,
        Other,
    }

    #[derive(Deserialize, Serialize, Debug, Clone)]
    pub struct Transcript {
        /// Gene name, e.g., `"BRCA1"` for BRCA1.
        #[serde(default)]
        pub gene_name: Option<String>,
        /// Alignments to the different genome builds, keyed by `"GRCh37"` / `"GRCh38"`.
        pub genome_builds: IndexMap<String, GenomeAlignment>,
        /// HGNC identifier, e.g. `"1100"` for BRCA1 which is `HGNC:1100`.
        #[serde(default)]
        pub hgnc: Option<String>,
        /// Identifier of the transcript, same as key in `transcripts`.
        pub id: String,
        /// Identifier of corresponding protein, e.g., `"NP_009225.1"` for `"NM_007294.3"`.
        #[serde(default)]
        pub protein: Option<String>,
        /// 0-based position of the start codon on the transcript.
        #[serde(default)]
        pub start_codon: Option<i32>,
        /// End position of the stop codon on the transcript.
        #[serde(default)]
        pub stop_codon: Option<i32>,
    }

    /// Representation of the strand.
    #[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Strand {
        #[serde(rename = "+")]
        Plus,
        #[serde(rename = "-")]
        Minus,
    }

    impl From<Strand> for i16 {
        fn from(value: Strand) -> Self {
            match value {
                Strand::Plus => 1,
                Strand::Minus => -1,
            }
        }
    }

    /// Representation of an exon in the JSON.
    #[derive(Deserialize, Serialize, Debug, Clone)]
    struct ExonHelper(i32, i32, i32, i32, i32, Option<String>);

    /// Representation of an exon after loading.
    #[derive(Serialize, Debug, Clone, PartialEq)]
    pub struct Exon {
        /// Start position on reference.
        pub alt_start_i: i32,
        /// End position on reference.
        pub alt_end_i: i32,
        /// Exon number.
        pub ord: i32,
        /// 1-based start position on the transcript.
        pub tx_start: i32,
        /// 1-based inclusive end position on the transcript.
        pub tx_end: i32,
        /// Alignment of an exon in CIGAR format.
        pub cigar: String,
    }

    /// Representation of `transcripts.*.genome_builds` value.
    #[derive(Deserialize, Serialize, Debug, Clone)]
    pub struct GenomeAlignment {
        /// ID of the contig.
        pub contig: String,
        /// List of exons.
        pub exons: Vec<Exon>,
        /// The strand.
        pub strand: Strand,
        /// Tags of the transcript.
        #[serde(default)]
        #[serde(deserialize_with = "deserialize_tag")]
        pub tag: Option<Vec<Tag>>,
    }

    /// Convert cdot gap to CIGAR string.
    ///
    /// ```text
    /// gap = 'M196 I1 M61 I1 M181'
    /// CIGAR = '196=1D61=1D181='
    /// ```
    pub fn gap_to_cigar(gap: &str) -> Result<String, String> {
        let mut result = String::new();

        for gap_op in gap.split_whitespace() {
            let (op, count) = gap_op.split_at_checked(1).ok_or_else(|| gap.to_string())?;
            result.push_str(count);
            match op {
                "M" => result.push('='),
                "I" => result.push('D'),
                "D" => result.push('I'),
                _ => return Err(format!("unknown gap operation {op:?} in {gap:?}")),
            }
        }

        Ok(result)
    }

    impl<'de> Deserialize<'de> for Exon {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let ExonHelper(alt_start_i, alt_end_i, ord, tx_start, tx_end, gap) =
                Deserialize::deserialize(deserializer)?;
            let cigar = match gap {
                Some(gap) => gap_to_cigar(&gap).map_err(serde::de::Error::custom)?,
                None => format!("{}=", alt_end_i - alt_start_i),
            };
            Ok(Exon {
                alt_start_i,
                alt_end_i,
                ord,
                tx_start,
                tx_end,
                cigar,
            })
        }
    }

    pub fn str_to_tag(s: &str) -> Tag {
        match s {
            "basic" => Tag::Basic,
            "Ensembl_canonical" => Tag::EnsemblCanonical,
            "MANE_Plus_Clinical" | "MANE Plus Clinical" => Tag::ManePlusClinical,
            "MANE_Select" | "MANE Select" => Tag::ManeSelect,
            "RefSeq Select" => Tag::RefSeqSelect,
            "GENCODE Primary" => Tag::GencodePrimary,
            _ => {
                log::warn!("unknown tag: {}", s);
                Tag::Other
            }
        }
    }

    fn deserialize_tag<'de, D>(deserializer: D) -> Result<Option<Vec<Tag>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)
            .map(|opt| opt.map(|tags| tags.split(',').map(str_to_tag).collect()))
    }
}

/// The `genome_builds` key for the alignments on `assembly`.
fn genome_build(assembly: Assembly) -> &'static str {
    match assembly {
        Assembly::Grch37 | Assembly::Grch37p10 => "GRCh37",
        Assembly::Grch38 => "GRCh38",
    }
}

/// Internal implementation of the transcript provider.
struct TxProvider {
    /// Versions of the loaded files, e.g., `cdot-0.2.21`.
    data_version: String,
    /// Transcripts by ID.
    transcripts: HashMap<String, models::Transcript>,
}

impl TxProvider {
    fn with_paths(json_paths: &[String]) -> Result<Self, Error> {
        let mut versions = Vec::new();
        let mut transcripts = HashMap::new();

        for json_path in json_paths {
            let container = Self::load(json_path)?;
            versions.push(format!("cdot-{}", container.cdot_version));
            transcripts.extend(container.transcripts.into_iter());
        }
        versions.dedup();

        log::debug!("json::TxProvider -- #transcripts = {}", transcripts.len());

        Ok(Self {
            data_version: versions.join(","),
            transcripts,
        })
    }

    fn load(json_path: &str) -> Result<models::Container, Error> {
        log::debug!("Loading cdot transcripts from {:?}", json_path);
        let start = Instant::now();
        let reader = std::io::BufReader::new(
            std::fs::File::open(json_path)
                .map_err(|_e| Error::CdotJsonOpen(json_path.to_string()))?,
        );
        let container: models::Container = if json_path.ends_with(".gz") {
            serde_json::from_reader(flate2::bufread::GzDecoder::new(reader))
        } else {
            serde_json::from_reader(reader)
        }
        .map_err(|e| Error::CdotJsonParse(json_path.to_string(), e.to_string()))?;
        log::debug!(
            "loading / deserializing {} transcripts from cdot took {:?}",
            container.transcripts.len(),
            start.elapsed()
        );

        Ok(container)
    }

    fn transcript(&self, tx_ac: &str) -> Result<&models::Transcript, Error> {
        self.transcripts
            .get(tx_ac)
            .ok_or_else(|| Error::NoTranscriptFound(tx_ac.to_string()))
    }

    fn alignment(
        &self,
        tx_ac: &str,
        assembly: Assembly,
    ) -> Result<(&models::Transcript, &models::GenomeAlignment), Error> {
        let tx = self.transcript(tx_ac)?;
        let build = genome_build(assembly);
        let alignment = tx
            .genome_builds
            .get(build)
            .ok_or_else(|| Error::NoAlignmentFound(tx_ac.to_string(), build.to_string()))?;
        Ok((tx, alignment))
    }

    fn get_tx_info(
        &self,
        tx_ac: &str,
        assembly: Assembly,
        assembly_map: &IndexMap<String, String>,
    ) -> Result<TxInfoRecord, Error> {
        let (tx, alignment) = self.alignment(tx_ac, assembly)?;
        let chromosome = assembly_map
            .get(&alignment.contig)
            .cloned()
            .unwrap_or_else(|| alignment.contig.clone());

        Ok(TxInfoRecord {
            hgnc: tx.gene_name.clone().unwrap_or_default(),
            tx_ac: tx_ac.to_string(),
            alt_ac: alignment.contig.clone(),
            chromosome,
            strand: alignment.strand.into(),
            cds_start_i: tx.start_codon,
            cds_end_i: tx.stop_codon,
        })
    }

    fn get_tx_exons(&self, tx_ac: &str, assembly: Assembly) -> Result<Vec<TxExonsRecord>, Error> {
        let (_, alignment) = self.alignment(tx_ac, assembly)?;
        Ok(alignment
            .exons
            .iter()
            .map(|exon| TxExonsRecord {
                tx_ac: tx_ac.to_string(),
                alt_ac: alignment.contig.clone(),
                alt_strand: alignment.strand.into(),
                ord: exon.ord,
                tx_start_i: exon.tx_start - 1,
                tx_end_i: exon.tx_end,
                alt_start_i: exon.alt_start_i,
                alt_end_i: exon.alt_end_i,
                cigar: exon.cigar.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
pub mod test_helpers {
    use crate::data::{
        error::Error,
        seqfetcher::{self, Backend},
    };

    use super::{Config, Provider};

    pub static TRANSCRIPTS_JSON: &str = "tests/data/cdot/transcripts.grch37.json";
    pub static TRANSCRIPTS_FASTA: &str = "tests/data/seqs/transcripts.fasta";

    pub fn build_provider() -> Result<Provider, Error> {
        Provider::new(&Config {
            json_paths: vec![TRANSCRIPTS_JSON.to_string()],
            seqfetcher: seqfetcher::Config {
                backend: Backend::Fasta {
                    path: TRANSCRIPTS_FASTA.to_string(),
                },
            },
        })
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

// <LICENSE>
// MIT License
//
// Copyright (c) 2022 SACGF
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
// </LICENSE>
