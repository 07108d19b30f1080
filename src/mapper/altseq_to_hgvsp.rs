//! Comparison of reference and alternative peptide into a `p.` variant.

use crate::{
    mapper::{
        altseq::{AltData, AltKind, RefTranscriptData},
        Error,
    },
    utils::{trim_common_prefixes, trim_common_suffixes},
    variant::{
        Accession, HgvsVariant, Mu, ProtInterval, ProtLocEdit, ProtPos, ProteinEdit,
        UncertainLengthChange,
    },
};

/// Builds the `p.` variant for one alternative sequence.
pub struct AltSeqToHgvsp<'a> {
    pub reference_data: &'a RefTranscriptData,
    pub alt_data: &'a AltData,
}

impl<'a> AltSeqToHgvsp<'a> {
    pub fn new(reference_data: &'a RefTranscriptData, alt_data: &'a AltData) -> Self {
        Self {
            reference_data,
            alt_data,
        }
    }

    fn ref_seq(&self) -> &str {
        &self.reference_data.aa_sequence
    }

    fn alt_seq(&self) -> &str {
        &self.alt_data.aa_sequence
    }

    pub fn build_hgvsp(&self) -> Result<HgvsVariant, Error> {
        let loc_edit = match self.alt_data.kind {
            AltKind::Unchanged => ProtLocEdit::NoChange,
            AltKind::Ambiguous => ProtLocEdit::Unknown,
            AltKind::NoProtein => ProtLocEdit::NoProtein,
            AltKind::Changed => self.compare().unwrap_or_else(|| {
                log::warn!(
                    "could not describe {} -> {} on {}",
                    self.ref_seq(),
                    self.alt_seq(),
                    self.reference_data.protein_accession
                );
                ProtLocEdit::Unknown
            }),
        };

        Ok(HgvsVariant::ProtVariant {
            accession: Accession::new(&self.reference_data.protein_accession),
            gene_symbol: None,
            loc_edit,
        })
    }

    /// Describe the difference of the peptides, `None` if the sequences are inconsistent.
    fn compare(&self) -> Option<ProtLocEdit> {
        let (ref_seq, alt_seq) = (self.ref_seq(), self.alt_seq());

        if ref_seq == alt_seq {
            return Some(match self.alt_data.variant_start_aa {
                Some(number) if self.alt_data.is_substitution => {
                    let pos = self.pos(usize::try_from(number - 1).ok()?)?;
                    ordinary(pos.clone(), pos, ProteinEdit::Ident)
                }
                _ => ProtLocEdit::NoChange,
            });
        }
        if ref_seq.starts_with('M') && !alt_seq.starts_with('M') {
            return Some(ProtLocEdit::InitiationUncertain);
        }

        let (start, ref_rest, alt_rest) = trim_common_prefixes(ref_seq, alt_seq);
        let Some(ref_aa) = residue(ref_seq, start) else {
            // Only residues past the reference stop differ.
            return Some(ProtLocEdit::NoChange);
        };
        let pos = self.pos(start)?;
        let Some(alt_aa) = residue(alt_seq, start) else {
            // The alternative reads off the end of the transcript without a stop codon.
            return match ref_aa {
                "*" => Some(self.extension(pos, start, None)),
                _ if self.alt_data.is_frameshift => Some(ordinary(
                    pos.clone(),
                    pos,
                    ProteinEdit::Fs {
                        alternative: None,
                        terminal: Some("*".to_string()),
                        length: UncertainLengthChange::Unknown,
                    },
                )),
                _ => self.in_frame(start, ref_rest, alt_rest),
            };
        };

        if ref_aa == "*" {
            return Some(self.extension(pos, start, Some(alt_aa)));
        }
        if alt_aa == "*" {
            return Some(ordinary(
                pos.clone(),
                pos,
                ProteinEdit::Subst {
                    alternative: "*".to_string(),
                },
            ));
        }
        if self.alt_data.is_frameshift {
            let length = match alt_seq[start..].find('*') {
                Some(stop) => UncertainLengthChange::Known(stop as i32 + 1),
                None => UncertainLengthChange::Unknown,
            };
            return Some(ordinary(
                pos.clone(),
                pos,
                ProteinEdit::Fs {
                    alternative: Some(alt_aa.to_string()),
                    terminal: Some("*".to_string()),
                    length,
                },
            ));
        }

        self.in_frame(start, ref_rest, alt_rest)
    }

    /// Stop loss, the alternative reads on into the 3' UTR.
    fn extension(&self, pos: ProtPos, start: usize, alt_aa: Option<&str>) -> ProtLocEdit {
        let change = match self.alt_seq().get(start..).and_then(|rest| rest.find('*')) {
            Some(stop) => UncertainLengthChange::Known(stop as i32),
            None => UncertainLengthChange::Unknown,
        };
        ordinary(
            pos.clone(),
            pos,
            ProteinEdit::Ext {
                aa_ext: alt_aa.map(str::to_string),
                ext_aa: Some("*".to_string()),
                change,
            },
        )
    }

    /// In-frame change starting at the 0-based residue `start`.
    fn in_frame(&self, start: usize, ref_rest: &str, alt_rest: &str) -> Option<ProtLocEdit> {
        let ref_seq = self.ref_seq();
        let aa_change = self.alt_data.net_base_change / 3;

        // A new stop codon truncates the alternative; the tail cannot be aligned.
        let truncated = alt_rest.ends_with('*')
            && (self.alt_seq().len() as i32) < ref_seq.len() as i32 + aa_change;
        let (deleted, inserted) = if truncated {
            let deleted = usize::try_from(alt_rest.len() as i32 - aa_change).unwrap_or_default();
            (ref_rest.get(..deleted)?, alt_rest)
        } else {
            let (_, deleted, inserted) = trim_common_suffixes(ref_rest, alt_rest);
            (deleted, inserted)
        };

        let first = self.pos(start)?;
        let last = || self.pos(start + deleted.len() - 1);
        Some(match (deleted.len(), inserted.len()) {
            (0, 0) => ProtLocEdit::NoChange,
            (1, 1) => ordinary(
                first.clone(),
                first,
                ProteinEdit::Subst {
                    alternative: inserted.to_string(),
                },
            ),
            (0, len) => {
                let before = start.checked_sub(1)?;
                if start >= len && ref_seq.get(start - len..start) == Some(inserted) {
                    ordinary(self.pos(start - len)?, self.pos(before)?, ProteinEdit::Dup)
                } else {
                    ordinary(
                        self.pos(before)?,
                        first,
                        ProteinEdit::Ins {
                            alternative: inserted.to_string(),
                        },
                    )
                }
            }
            (_, 0) => ordinary(first, last()?, ProteinEdit::Del),
            (_, _) => ordinary(
                first,
                last()?,
                ProteinEdit::DelIns {
                    alternative: inserted.to_string(),
                },
            ),
        })
    }

    /// Reference residue at the 0-based `index`.
    fn pos(&self, index: usize) -> Option<ProtPos> {
        Some(ProtPos {
            aa: residue(self.ref_seq(), index)?.to_string(),
            number: index as i32 + 1,
        })
    }
}

fn residue(seq: &str, index: usize) -> Option<&str> {
    seq.get(index..index + 1)
}

fn ordinary(start: ProtPos, end: ProtPos, edit: ProteinEdit) -> ProtLocEdit {
    ProtLocEdit::Ordinary {
        loc: Mu::Certain(ProtInterval { start, end }),
        edit: Mu::Certain(edit),
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use anyhow::Error;
    use biocommons_bioutils::assemblies::Assembly;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::AltSeqToHgvsp;
    use crate::{
        mapper::altseq::{AltSeqBuilder, RefTranscriptData},
        variant::{CdsFrom, CdsInterval, CdsLocEdit, CdsPos, HgvsVariant, Mu, NaEdit},
    };

    /// Provider serving transcripts from `tests/data/mapper/sanity_cp.tsv`.
    mod sanity_mock {
        use std::path::Path;

        use biocommons_bioutils::assemblies::Assembly;

        use crate::data::{
            error::Error,
            interface::{Provider as ProviderInterface, TxExonsRecord, TxInfoRecord},
        };

        #[derive(Debug, serde::Deserialize)]
        struct ProviderRecord {
            pub accession: String,
            pub transcript_sequence: String,
            pub cds_start_i: i32,
            pub cds_end_i: i32,
        }

        pub struct Provider {
            records: Vec<ProviderRecord>,
        }

        impl Provider {
            pub fn new(path: &Path) -> Result<Self, anyhow::Error> {
                let mut records = Vec::new();

                let mut rdr = csv::ReaderBuilder::new()
                    .delimiter(b'\t')
                    .has_headers(true)
                    .from_path(path)?;
                for record in rdr.deserialize() {
                    records.push(record?);
                }

                Ok(Self { records })
            }

            fn record(&self, tx_ac: &str) -> Result<&ProviderRecord, Error> {
                self.records
                    .iter()
                    .find(|record| record.accession == tx_ac)
                    .ok_or_else(|| Error::NoTranscriptFound(tx_ac.to_string()))
            }
        }

        impl ProviderInterface for Provider {
            fn data_version(&self) -> &str {
                "sanity-mock"
            }

            fn get_tx_info(&self, tx_ac: &str, _assembly: Assembly) -> Result<TxInfoRecord, Error> {
                let record = self.record(tx_ac)?;
                Ok(TxInfoRecord {
                    hgnc: "MOCK".to_string(),
                    tx_ac: record.accession.clone(),
                    alt_ac: record.accession.clone(),
                    chromosome: "MOCK".to_string(),
                    strand: 1,
                    cds_start_i: Some(record.cds_start_i),
                    cds_end_i: Some(record.cds_end_i),
                })
            }

            fn get_tx_exons(
                &self,
                _tx_ac: &str,
                _assembly: Assembly,
            ) -> Result<Vec<TxExonsRecord>, Error> {
                panic!("for test use only");
            }

            fn get_seq_part(
                &self,
                ac: &str,
                begin: Option<usize>,
                end: Option<usize>,
            ) -> Result<String, Error> {
                let seq = &self.record(ac)?.transcript_sequence;
                let begin = begin.unwrap_or_default();
                let end = end.unwrap_or(seq.len());
                Ok(seq[begin..end].to_string())
            }

            fn get_pro_ac_for_tx_ac(&self, _tx_ac: &str) -> Result<Option<String>, Error> {
                Ok(None)
            }
        }
    }

    /// Parse `12`, `-3`, `*5`, or `9+1` into a position.
    fn cds_pos(value: &str) -> CdsPos {
        let (cds_from, value) = match value.strip_prefix('*') {
            Some(rest) => (CdsFrom::End, rest),
            None => (CdsFrom::Start, value),
        };
        let split = value[1..].find(|c: char| c == '+' || c == '-').map(|i| i + 1);
        let (base, offset) = match split {
            Some(i) => (&value[..i], Some(value[i..].parse().expect("invalid offset"))),
            None => (value, None),
        };
        CdsPos {
            base: base.parse().expect("invalid base"),
            offset,
            cds_from,
        }
    }

    fn build_hgvsp(
        tx_ac: &str,
        start: &str,
        end: &str,
        reference: &str,
        alternative: &str,
    ) -> Result<HgvsVariant, Error> {
        let provider = sanity_mock::Provider::new(Path::new("tests/data/mapper/sanity_cp.tsv"))?;
        let reference_data =
            RefTranscriptData::new(&provider, tx_ac, Some("MOCK"), Assembly::Grch37p10)?;
        let loc_edit = CdsLocEdit {
            loc: Mu::Certain(CdsInterval {
                start: cds_pos(start),
                end: cds_pos(end),
            }),
            edit: Mu::Certain(NaEdit::RefAlt {
                reference: reference.to_string(),
                alternative: alternative.to_string(),
            }),
        };

        let alt_data = AltSeqBuilder::new(&loc_edit, &reference_data).build_altseq()?;
        Ok(AltSeqToHgvsp::new(&reference_data, &alt_data[0]).build_hgvsp()?)
    }

    // MOCK_1.1 translates to MKASWADYV*, MOCK_2.1 to MKAS*.
    #[rstest]
    #[case("MOCK_1.1", "6", "6", "A", "G", "Lys2=")]
    #[case("MOCK_1.1", "6", "6", "A", "C", "Lys2Asn")]
    #[case("MOCK_1.1", "7", "9", "GCT", "TGG", "Ala3Trp")]
    #[case("MOCK_1.1", "14", "14", "G", "A", "Trp5Ter")]
    #[case("MOCK_1.1", "1", "1", "A", "G", "Met1?")]
    #[case("MOCK_1.1", "8", "8", "C", "", "Ala3ValfsTer12")]
    #[case("MOCK_2.1", "4", "4", "A", "", "Ala3LeufsTer?")]
    #[case("MOCK_1.1", "28", "28", "T", "C", "Ter10GlnextTer3")]
    #[case("MOCK_1.1", "10", "12", "TCC", "", "Ser4del")]
    #[case("MOCK_1.1", "12", "13", "CT", "CGGGT", "Ser4_Trp5insGly")]
    #[case("MOCK_1.1", "9", "10", "TT", "TGCTT", "Ala3dup")]
    #[case("MOCK_1.1", "7", "12", "GCTTCC", "CTGCTGCTG", "Ala3_Ser4delinsLeuLeuLeu")]
    #[case("MOCK_1.1", "7", "9", "GCT", "CTGCTGTAA", "Ala3delinsLeuLeuTer")]
    #[case("MOCK_2.1", "13", "15", "TAA", "", "Ter5extTer?")]
    #[case("MOCK_2.1", "10", "*2", "TCCTAACC", "", "Ser4fsTer?")]
    #[case("MOCK_2.1", "10", "15", "TCCTAA", "", "Ser4_Ter5del")]
    #[case("MOCK_1.1", "-2", "-2", "G", "A", "=")]
    #[case("MOCK_1.1", "*2", "*2", "G", "A", "=")]
    #[case("MOCK_1.1", "9+1", "9+1", "G", "A", "?")]
    #[case("MOCK_1.1", "-3", "*17", "", "", "0")]
    fn sanity_cp(
        #[case] tx_ac: &str,
        #[case] start: &str,
        #[case] end: &str,
        #[case] reference: &str,
        #[case] alternative: &str,
        #[case] expected: &str,
    ) -> Result<(), Error> {
        let var_p = build_hgvsp(tx_ac, start, end, reference, alternative)?;

        assert_eq!(format!("{}", var_p), format!("MOCK:p.{}", expected));

        Ok(())
    }

    #[test]
    fn protein_accession_from_digest() -> Result<(), Error> {
        let provider = sanity_mock::Provider::new(Path::new("tests/data/mapper/sanity_cp.tsv"))?;
        let reference_data =
            RefTranscriptData::new(&provider, "MOCK_2.1", None, Assembly::Grch37p10)?;

        assert_eq!(
            reference_data.protein_accession,
            crate::sequences::pseq_to_ac("MKAS*")?
        );

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
