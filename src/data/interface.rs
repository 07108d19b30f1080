//! Definition of the interface for accessing transcript alignments and sequences.

use biocommons_bioutils::assemblies::{Assembly, ASSEMBLY_INFOS};
use indexmap::IndexMap;

use crate::data::error::Error;

/// Information about a transcript and its alignment to the genome.
///
/// ```text
/// hgnc        | AOAH
/// tx_ac       | NM_001637.3
/// alt_ac      | NC_000007.13
/// chromosome  | 7
/// strand      | -1
/// cds_start_i | 100
/// cds_end_i   | 1828
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TxInfoRecord {
    pub hgnc: String,
    pub tx_ac: String,
    /// Accession of the aligned genomic sequence.
    pub alt_ac: String,
    /// Chromosome name of `alt_ac` in the assembly, e.g., `"7"`.
    pub chromosome: String,
    pub strand: i16,
    /// 0-based start of the CDS on the transcript, `None` for non-coding transcripts.
    pub cds_start_i: Option<i32>,
    /// 0-based exclusive end of the CDS on the transcript.
    pub cds_end_i: Option<i32>,
}

/// Alignment of one exon, coordinates are 0-based and right-open.
///
/// ```text
/// tx_ac       | NM_001637.3
/// alt_ac      | NC_000007.13
/// alt_strand  | -1
/// ord         | 2
/// tx_start_i  | 1600
/// tx_end_i    | 1800
/// alt_start_i | 36561543
/// alt_end_i   | 36561743
/// cigar       | 200=
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TxExonsRecord {
    pub tx_ac: String,
    pub alt_ac: String,
    pub alt_strand: i16,
    /// Exon number in transcript order, starting at 0.
    pub ord: i32,
    pub tx_start_i: i32,
    pub tx_end_i: i32,
    pub alt_start_i: i32,
    pub alt_end_i: i32,
    /// Alignment of the exon in transcript orientation.
    pub cigar: String,
}

/// Interface for data providers.
pub trait Provider {
    /// Return the data version, e.g., `cdot-0.2.21`.
    fn data_version(&self) -> &str;

    /// Return transcript information for the alignment on `assembly`.
    ///
    /// # Arguments
    ///
    /// * `tx_ac` -- transcript accession with version (e.g., 'NM_000051.3')
    /// * `assembly` -- the genome assembly the transcript is aligned to
    fn get_tx_info(&self, tx_ac: &str, assembly: Assembly) -> Result<TxInfoRecord, Error>;

    /// Return the exon alignments of `tx_ac` on `assembly`, in any order.
    fn get_tx_exons(&self, tx_ac: &str, assembly: Assembly)
        -> Result<Vec<TxExonsRecord>, Error>;

    /// Return sequence part for the given accession.
    ///
    /// # Arguments
    ///
    /// * `ac` -- accession
    /// * `begin` -- start position (0-based, start of sequence if missing)
    /// * `end` -- end position (0-based, end of sequence if missing)
    fn get_seq_part(
        &self,
        ac: &str,
        begin: Option<usize>,
        end: Option<usize>,
    ) -> Result<String, Error>;

    /// Return the (single) associated protein accession for a given transcript accession,
    /// or `None` if not known.
    fn get_pro_ac_for_tx_ac(&self, tx_ac: &str) -> Result<Option<String>, Error>;

    /// Return the full transcript sequence.
    fn get_tx_seq(&self, tx_ac: &str) -> Result<String, Error> {
        self.get_seq_part(tx_ac, None, None)
    }

    /// Return a map from accession to chromosome name for the given assembly.
    ///
    /// For example, for `Assembly::Grch38` the value for `"NC_000001.11"` is `"1"`.
    fn get_assembly_map(&self, assembly: Assembly) -> IndexMap<String, String> {
        IndexMap::from_iter(
            ASSEMBLY_INFOS[assembly]
                .sequences
                .iter()
                .map(|record| (record.refseq_ac.clone(), record.name.clone())),
        )
    }

    /// Resolve a chromosome name such as `"7"`, `"chr7"`, or `"chrM"` to its accession.
    ///
    /// Accessions of the assembly are passed through.
    fn chr_to_ac(&self, chromosome: &str, assembly: Assembly) -> Result<String, Error> {
        let assembly_map = self.get_assembly_map(assembly);
        if assembly_map.contains_key(chromosome) {
            return Ok(chromosome.to_string());
        }

        let name = chromosome.strip_prefix("chr").unwrap_or(chromosome);
        let name = if name == "M" { "MT" } else { name };
        assembly_map
            .iter()
            .find(|(_, chrom)| chrom.as_str() == name)
            .map(|(ac, _)| ac.clone())
            .ok_or_else(|| {
                Error::NoChromosomeAccession(chromosome.to_string(), format!("{assembly:?}"))
            })
    }
}

#[cfg(test)]
mod test {
    use biocommons_bioutils::assemblies::Assembly;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{Provider, TxExonsRecord, TxInfoRecord};
    use crate::data::error::Error;

    /// Provider without any transcripts, for the default methods.
    struct EmptyProvider;

    impl Provider for EmptyProvider {
        fn data_version(&self) -> &str {
            "empty"
        }

        fn get_tx_info(&self, tx_ac: &str, _assembly: Assembly) -> Result<TxInfoRecord, Error> {
            Err(Error::NoTranscriptFound(tx_ac.to_string()))
        }

        fn get_tx_exons(
            &self,
            tx_ac: &str,
            _assembly: Assembly,
        ) -> Result<Vec<TxExonsRecord>, Error> {
            Err(Error::NoTranscriptFound(tx_ac.to_string()))
        }

        fn get_seq_part(
            &self,
            ac: &str,
            _begin: Option<usize>,
            _end: Option<usize>,
        ) -> Result<String, Error> {
            Err(Error::SequenceUnavailable {
                ac: ac.to_string(),
                cause: "empty provider".to_string(),
            })
        }

        fn get_pro_ac_for_tx_ac(&self, _tx_ac: &str) -> Result<Option<String>, Error> {
            Ok(None)
        }
    }

    #[rstest]
    #[case("7", Assembly::Grch37p10, "NC_000007.13")]
    #[case("chr7", Assembly::Grch37p10, "NC_000007.13")]
    #[case("X", Assembly::Grch37p10, "NC_000023.10")]
    #[case("7", Assembly::Grch38, "NC_000007.14")]
    #[case("chrM", Assembly::Grch38, "NC_012920.1")]
    #[case("MT", Assembly::Grch38, "NC_012920.1")]
    #[case("NC_000007.13", Assembly::Grch37p10, "NC_000007.13")]
    fn chr_to_ac(
        #[case] chromosome: &str,
        #[case] assembly: Assembly,
        #[case] expected: &str,
    ) -> Result<(), Error> {
        assert_eq!(EmptyProvider.chr_to_ac(chromosome, assembly)?, expected);

        Ok(())
    }

    #[test]
    fn chr_to_ac_unknown() {
        assert!(matches!(
            EmptyProvider.chr_to_ac("chr99", Assembly::Grch38),
            Err(Error::NoChromosomeAccession(_, _))
        ));
    }

    #[test]
    fn tx_seq_goes_through_seq_part() {
        assert_eq!(
            EmptyProvider
                .get_tx_seq("NM_001637.3")
                .map_err(|e| e.to_string()),
            Err("No sequence available for NM_001637.3 (empty provider)".to_string())
        );
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
