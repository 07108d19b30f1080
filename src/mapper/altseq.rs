//! Code for building the alternative transcript sequence of a `c.` variant.

use biocommons_bioutils::assemblies::Assembly;

use crate::{
    data::interface::Provider,
    mapper::Error,
    sequences::{pseq_to_ac, translate_cds},
    variant::{CdsFrom, CdsInterval, CdsLocEdit, CdsPos, NaEdit},
};

/// Reference transcript and peptide for one `c.` to `p.` projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefTranscriptData {
    /// Accession of the transcript.
    pub tx_ac: String,
    /// Transcript nucleotide sequence.
    pub transcript_sequence: String,
    /// Translated amino acid sequence, including the terminal `*`.
    pub aa_sequence: String,
    /// 1-based CDS start position on transcript.
    pub cds_start: i32,
    /// 1-based CDS end position on transcript.
    pub cds_stop: i32,
    /// Accession of the protein or `MD5_${md5sum}`.
    pub protein_accession: String,
}

impl RefTranscriptData {
    /// Construct new instance fetching data from the provider.
    ///
    /// # Args
    ///
    /// * `provider` -- Data provider to query.
    /// * `tx_ac` -- Transcript accession.
    /// * `pro_ac` -- Protein accession, resolved through the provider if `None`.
    /// * `assembly` -- Assembly to read the transcript's CDS bounds from.
    pub fn new(
        provider: &dyn Provider,
        tx_ac: &str,
        pro_ac: Option<&str>,
        assembly: Assembly,
    ) -> Result<Self, Error> {
        let tx_info = provider.get_tx_info(tx_ac, assembly)?;
        let (Some(cds_start_i), Some(cds_end_i)) = (tx_info.cds_start_i, tx_info.cds_end_i) else {
            return Err(Error::CdsUndefined(tx_ac.to_string()));
        };
        let transcript_sequence = provider.get_tx_seq(tx_ac)?;

        // Use 1-based HGVS coordinates.
        let cds_start = cds_start_i + 1;
        let cds_stop = cds_end_i;

        let tx_seq_to_translate = usize::try_from(cds_start_i)
            .ok()
            .zip(usize::try_from(cds_end_i).ok())
            .and_then(|(begin, end)| transcript_sequence.get(begin..end))
            .ok_or_else(|| Error::SequenceDataUnavailable {
                ac: tx_ac.to_string(),
                cause: format!(
                    "CDS {}..{} is outside the transcript sequence of length {}",
                    cds_start,
                    cds_stop,
                    transcript_sequence.len()
                ),
            })?;
        // Coding sequences that are not divisible by 3 are not supported.
        if tx_seq_to_translate.len() % 3 != 0 {
            return Err(Error::TranscriptLengthInvalid(
                tx_ac.to_string(),
                tx_seq_to_translate.len(),
            ));
        }

        let aa_sequence = translate_cds(tx_seq_to_translate, true, "*")?;
        let protein_accession = if let Some(pro_ac) = pro_ac {
            pro_ac.to_string()
        } else if let Some(pro_ac) = provider.get_pro_ac_for_tx_ac(tx_ac)? {
            pro_ac
        } else {
            pseq_to_ac(&aa_sequence)?
        };

        Ok(Self {
            tx_ac: tx_ac.to_string(),
            transcript_sequence,
            aa_sequence,
            cds_start,
            cds_stop,
            protein_accession,
        })
    }

    /// 0-based transcript index of a `c.` position without offset.
    ///
    /// Coding positions past the last CDS base are rejected, those are written `c.*N`.
    fn tx_index(&self, pos: &CdsPos) -> Result<i32, Error> {
        let cds_len = self.cds_stop - self.cds_start + 1;
        match pos.cds_from {
            CdsFrom::Start if pos.base > cds_len => Err(Error::PositionOutOfBounds {
                ac: self.tx_ac.clone(),
                pos: pos.base,
                bounds: format!("[1, {cds_len}]"),
            }),
            CdsFrom::Start if pos.base > 0 => Ok(self.cds_start + pos.base - 2),
            CdsFrom::Start => Ok(self.cds_start + pos.base - 1),
            CdsFrom::End => Ok(self.cds_stop + pos.base - 1),
        }
    }
}

/// How the alternative sequence relates to the reference protein.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltKind {
    /// The edit changes the coding sequence; compare the peptides.
    Changed,
    /// The edit lies outside the coding sequence (`p.=`).
    Unchanged,
    /// The effect on the protein cannot be predicted (`p.?`).
    Ambiguous,
    /// The whole coding sequence is deleted (`p.0`).
    NoProtein,
}

/// Alternative transcript and peptide after applying an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltData {
    pub kind: AltKind,
    /// Transcript sequence with the edit applied.
    pub transcript_sequence: String,
    /// Translation from the CDS start up to and including the first stop codon.
    pub aa_sequence: String,
    /// 1-based CDS start position on the transcript.
    pub cds_start: i32,
    /// 1-based residue at which the reading frame changes.
    pub frameshift_start: Option<i32>,
    /// Whether a single nucleotide was replaced by another one.
    pub is_substitution: bool,
    pub is_frameshift: bool,
    /// 1-based first residue touched by the edit.
    pub variant_start_aa: Option<i32>,
    /// Number of inserted minus number of deleted nucleotides.
    pub net_base_change: i32,
}

impl AltData {
    /// Alternative data identical to the reference.
    fn from_reference(reference_data: &RefTranscriptData, kind: AltKind) -> Self {
        Self {
            kind,
            transcript_sequence: reference_data.transcript_sequence.clone(),
            aa_sequence: reference_data.aa_sequence.clone(),
            cds_start: reference_data.cds_start,
            frameshift_start: None,
            is_substitution: false,
            is_frameshift: false,
            variant_start_aa: None,
            net_base_change: 0,
        }
    }
}

/// Region of the transcript that a `c.` interval falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VariantLocation {
    Exon,
    Intron,
    FivePrimeUtr,
    ThreePrimeUtr,
    /// From the 5' UTR to the 3' UTR.
    WholeGene,
}

impl VariantLocation {
    fn of(interval: &CdsInterval) -> Self {
        let (start, end) = (&interval.start, &interval.end);
        if start.offset.unwrap_or_default() != 0 || end.offset.unwrap_or_default() != 0 {
            return VariantLocation::Intron;
        }
        let in_five_prime_utr = |pos: &CdsPos| pos.cds_from == CdsFrom::Start && pos.base < 0;
        match (start.cds_from, end.cds_from) {
            (CdsFrom::End, CdsFrom::End) => VariantLocation::ThreePrimeUtr,
            _ if in_five_prime_utr(start) && in_five_prime_utr(end) => {
                VariantLocation::FivePrimeUtr
            }
            (_, CdsFrom::End) if in_five_prime_utr(start) => VariantLocation::WholeGene,
            _ => VariantLocation::Exon,
        }
    }
}

/// Utility to insert an hgvs variant into a transcript sequence.
///
/// Generates a record corresponding to the modified transcript sequence, along with annotations
/// for use in conversion to an hgvsp tag.
pub struct AltSeqBuilder<'a> {
    pub loc_edit: &'a CdsLocEdit,
    pub reference_data: &'a RefTranscriptData,
}

impl<'a> AltSeqBuilder<'a> {
    pub fn new(loc_edit: &'a CdsLocEdit, reference_data: &'a RefTranscriptData) -> Self {
        Self {
            loc_edit,
            reference_data,
        }
    }

    /// Apply the edit and return the alternative sequences.
    ///
    /// One entry is returned for the supported edits; the list leaves room for edits with
    /// more than one possible outcome.
    pub fn build_altseq(&self) -> Result<Vec<AltData>, Error> {
        let (reference, alternative) = match self.loc_edit.edit.inner() {
            NaEdit::RefAlt {
                reference,
                alternative,
            } => (reference, alternative),
            edit @ (NaEdit::Del { .. }
            | NaEdit::Ins { .. }
            | NaEdit::Dup { .. }
            | NaEdit::Repeat { .. }) => {
                return Err(Error::UnsupportedEditType {
                    edit: edit.to_string(),
                    conversion: "c_to_p".to_string(),
                })
            }
        };

        let interval = self.loc_edit.loc.inner();
        let alt_data = match VariantLocation::of(interval) {
            VariantLocation::Intron => {
                AltData::from_reference(self.reference_data, AltKind::Ambiguous)
            }
            VariantLocation::FivePrimeUtr | VariantLocation::ThreePrimeUtr => {
                self.checked_range(interval, reference)?;
                AltData::from_reference(self.reference_data, AltKind::Unchanged)
            }
            VariantLocation::WholeGene => {
                self.checked_range(interval, reference)?;
                let kind = if alternative.is_empty() {
                    AltKind::NoProtein
                } else {
                    AltKind::Ambiguous
                };
                AltData::from_reference(self.reference_data, kind)
            }
            VariantLocation::Exon => self.incorporate_delins(interval, reference, alternative)?,
        };

        Ok(vec![alt_data])
    }

    /// Transcript range of `interval`, checked against the stated reference.
    fn checked_range(
        &self,
        interval: &CdsInterval,
        reference: &str,
    ) -> Result<std::ops::Range<usize>, Error> {
        let tx_ac = &self.reference_data.tx_ac;
        let sequence = &self.reference_data.transcript_sequence;
        let start = self.reference_data.tx_index(&interval.start)?;
        let end = self.reference_data.tx_index(&interval.end)? + 1;

        let bounds = || format!("[0, {})", sequence.len());
        let start = usize::try_from(start).map_err(|_| Error::PositionOutOfBounds {
            ac: tx_ac.clone(),
            pos: interval.start.base,
            bounds: bounds(),
        })?;
        let range = usize::try_from(end)
            .ok()
            .filter(|&end| end >= start && end <= sequence.len())
            .map(|end| start..end)
            .ok_or_else(|| Error::PositionOutOfBounds {
                ac: tx_ac.clone(),
                pos: interval.end.base,
                bounds: bounds(),
            })?;

        let actual = &sequence[range.clone()];
        if !reference.is_empty() && !reference.eq_ignore_ascii_case(actual) {
            return Err(Error::ReferenceMismatch {
                ac: tx_ac.clone(),
                pos: interval.to_string(),
                stated: reference.to_string(),
                actual: actual.to_string(),
            });
        }

        Ok(range)
    }

    /// Replace the interval's bases by `alternative` and translate the result.
    fn incorporate_delins(
        &self,
        interval: &CdsInterval,
        reference: &str,
        alternative: &str,
    ) -> Result<AltData, Error> {
        let range = self.checked_range(interval, reference)?;
        let ref_length = range.len();

        let mut transcript_sequence = self.reference_data.transcript_sequence.clone();
        transcript_sequence.replace_range(range, alternative);

        let net_base_change = alternative.len() as i32 - ref_length as i32;
        let is_frameshift = net_base_change % 3 != 0;
        let is_substitution = ref_length == 1 && alternative.len() == 1;
        let variant_start_aa = match interval.start.cds_from {
            CdsFrom::Start if interval.start.base > 0 => (interval.start.base + 2) / 3,
            _ => 1,
        };

        let aa_sequence = translate_from(&transcript_sequence, self.reference_data.cds_start)?;
        log::trace!(
            "incorporated {} at {}: {}",
            alternative,
            interval,
            aa_sequence
        );

        Ok(AltData {
            kind: AltKind::Changed,
            transcript_sequence,
            aa_sequence,
            cds_start: self.reference_data.cds_start,
            frameshift_start: is_frameshift.then_some(variant_start_aa),
            is_substitution,
            is_frameshift,
            variant_start_aa: Some(variant_start_aa),
            net_base_change,
        })
    }
}

/// Translate from the 1-based `cds_start` through the first stop codon.
///
/// Trailing bases that do not fill a codon are ignored.  Without a stop codon, the result
/// runs to the end of the transcript.
fn translate_from(transcript_sequence: &str, cds_start: i32) -> Result<String, Error> {
    let cds = usize::try_from(cds_start - 1)
        .ok()
        .and_then(|begin| transcript_sequence.get(begin..))
        .unwrap_or_default();
    let cds = &cds[..cds.len() - cds.len() % 3];
    let aa_sequence = translate_cds(cds, true, "*")?;
    Ok(match aa_sequence.find('*') {
        Some(stop) => aa_sequence[..=stop].to_string(),
        None => aa_sequence,
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
