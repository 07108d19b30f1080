//! Mapping positions between the genome, a transcript, and its coding sequence.
//!
//! `TranscriptMapper` holds the alignment of one transcript and converts intervals
//! between `g.`, `r.`, and `c.` coordinates.

// HGVS has no position 0: c. counts -3, -2, -1, 1, 2, 3 and the same holds for r.
// Calculations are done on internal 0-based coordinates (c0, r0) that do include 0
// and only translated to HGVS positions at the boundaries.
//
//              upstream     5' UTR           CDS          3' UTR      downstr
//                                     |>
//            - - - - - - ———————————— ||||||||||||||||| ——————————— - - - - - -
//                           a     b     C     D     E     f     g     h     i
//    c.        -4    -3    -2    -1  !  1     2     3  ! *1    *2    *3    *4
//    c0        -4    -3    -2    -1     0     1     2     3     4     5     6
//    r0        -2    -1     0     1     2     3     4     5     6     7     8
//    r.        -2    -1  !  1     2     3     4     5     6     7     8     9
//    g.   ... 123   124   125   126   127   128   129   130   131   132   133 ...

use biocommons_bioutils::assemblies::Assembly;
use serde::{Deserialize, Serialize};

use crate::{
    data::interface::{Provider, TxExonsRecord},
    mapper::{
        cigar::{
            parse_cigar_string, CigarElement, CigarMapper, CigarMapperResult, CigarOp,
            CigarString, IntervalEnd,
        },
        Error,
    },
    variant::{CdsFrom, CdsInterval, CdsPos, GenomeInterval, Mu, RnaInterval, RnaPos},
};

/// Convert zero-based coordinate to hgvs (1 based, missing zero)
fn zbc_to_hgvs(i: i32) -> i32 {
    if i >= 0 {
        i + 1
    } else {
        i
    }
}

/// Convert hgvs (1 based, missing zero)
fn hgvs_to_zbc(i: i32) -> i32 {
    if i >= 1 {
        i - 1
    } else {
        i
    }
}

/// Builds a single CIGAR string representing the alignment of the transcript to the genome,
/// including introns as skips.
///
/// The exons must be sorted by genomic start; the result is in genome orientation.
pub fn build_tx_cigar(exons: &[TxExonsRecord], strand: i16) -> Result<CigarString, Error> {
    let (first, rest) = exons
        .split_first()
        .ok_or_else(|| Error::NoExons("<no exon records>".to_string()))?;

    let exon_cigar = |record: &TxExonsRecord| -> Result<CigarString, Error> {
        let mut cigar = parse_cigar_string(&record.cigar)?;
        if strand == -1 {
            cigar.reverse();
        }
        Ok(cigar)
    };

    let mut result = exon_cigar(first)?;
    let mut prev_end = first.alt_end_i;
    for exon in rest {
        result.push(CigarElement {
            count: exon.alt_start_i - prev_end,
            op: CigarOp::Skip,
        });
        let mut cigar = exon_cigar(exon)?;
        result.append(&mut cigar);
        prev_end = exon.alt_end_i;
    }
    Ok(result)
}

/// Helper function that wraps a value into `Option` but returns `None` for the default value.
pub fn none_if_default<T>(value: T) -> Option<T>
where
    T: Default + PartialEq,
{
    if value == T::default() {
        None
    } else {
        Some(value)
    }
}

/// Configuration for transcript mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Require positions to be within the transcript's alignment.
    pub strict_bounds: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict_bounds: true,
        }
    }
}

/// Maps intervals of one transcript between genomic (g), transcript (r), and cds (c)
/// coordinates.
///
/// The alignment is read from the provider once, on construction.
#[derive(Debug, Clone)]
pub struct TranscriptMapper {
    config: Config,
    tx_ac: String,
    alt_ac: String,
    chromosome: String,
    hgnc: String,
    strand: i16,
    /// Genomic 0-based start of the first exon in genome order.
    gc_offset: i32,
    cds_start_i: Option<i32>,
    cds_end_i: Option<i32>,
    tgt_len: i32,
    cigar_mapper: CigarMapper,
}

impl TranscriptMapper {
    pub fn new(
        config: &Config,
        provider: &dyn Provider,
        tx_ac: &str,
        assembly: Assembly,
    ) -> Result<Self, Error> {
        let tx_info = provider.get_tx_info(tx_ac, assembly)?;
        let mut exons = provider.get_tx_exons(tx_ac, assembly)?;
        if exons.is_empty() {
            return Err(Error::NoExons(tx_ac.to_string()));
        }

        exons.sort_by_key(|exon| exon.ord);
        for pair in exons.windows(2) {
            if pair[0].tx_end_i != pair[1].tx_start_i {
                return Err(Error::NonAdjacentExons(
                    tx_ac.to_string(),
                    format!(
                        "exon {} ends at {}, exon {} starts at {}",
                        pair[0].ord, pair[0].tx_end_i, pair[1].ord, pair[1].tx_start_i
                    ),
                ));
            }
        }

        let (cds_start_i, cds_end_i) = match (tx_info.cds_start_i, tx_info.cds_end_i) {
            (Some(start), Some(end)) => (Some(start), Some(end)),
            (None, None) => (None, None),
            _ => return Err(Error::InconsistentCdsStartEnd(tx_ac.to_string())),
        };

        let strand = tx_info.strand;
        if strand != 1 && strand != -1 {
            return Err(Error::InvalidStrand {
                ac: tx_ac.to_string(),
                strand,
            });
        }
        exons.sort_by_key(|exon| exon.alt_start_i);
        let cigar_mapper = CigarMapper::new(&build_tx_cigar(&exons, strand)?);
        let gc_offset = exons[0].alt_start_i;
        let tgt_len = cigar_mapper.tgt_len;
        log::debug!(
            "built mapper for {} on {} (strand {}, {} exons, length {})",
            tx_ac,
            tx_info.alt_ac,
            strand,
            exons.len(),
            tgt_len
        );

        Ok(Self {
            config: config.clone(),
            tx_ac: tx_ac.to_string(),
            alt_ac: tx_info.alt_ac,
            chromosome: tx_info.chromosome,
            hgnc: tx_info.hgnc,
            strand,
            gc_offset,
            cds_start_i,
            cds_end_i,
            tgt_len,
            cigar_mapper,
        })
    }

    pub fn tx_ac(&self) -> &str {
        &self.tx_ac
    }

    /// Accession of the genomic sequence the transcript is aligned to.
    pub fn alt_ac(&self) -> &str {
        &self.alt_ac
    }

    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// HGNC gene symbol of the transcript.
    pub fn hgnc(&self) -> &str {
        &self.hgnc
    }

    /// Strand of the transcript relative to the genome, `1` or `-1`.
    pub fn strand(&self) -> i16 {
        self.strand
    }

    pub fn is_coding_transcript(&self) -> bool {
        self.cds_start_i.is_some()
    }

    /// Transcript length in bases.
    pub fn tx_len(&self) -> i32 {
        self.tgt_len
    }

    /// Whether the 1-based genome interval lies within the transcript's alignment.
    pub fn is_g_interval_in_bounds(&self, g_interval: &GenomeInterval) -> bool {
        match (g_interval.start, g_interval.end) {
            (Some(start), Some(end)) => {
                let grs = start - 1 - self.gc_offset;
                let gre = end - 1 - self.gc_offset;
                grs >= 0 && gre < self.cigar_mapper.ref_len
            }
            _ => false,
        }
    }

    fn out_of_bounds(&self, pos: i32, lower: i32, upper: i32) -> Error {
        Error::PositionOutOfBounds {
            ac: self.tx_ac.clone(),
            pos,
            bounds: format!("[{lower}, {upper}]"),
        }
    }

    /// Replace the CIGAR string in bounds errors of the cigar mapper by the accession.
    fn with_tx_ac(&self, err: Error) -> Error {
        match err {
            Error::PositionOutOfBounds { pos, bounds, .. } => Error::PositionOutOfBounds {
                ac: self.tx_ac.clone(),
                pos,
                bounds,
            },
            err => err,
        }
    }

    /// Convert a genomic (g.) interval to a transcript (r.) interval.
    pub fn g_to_r(&self, g_interval: &GenomeInterval) -> Result<Mu<RnaInterval>, Error> {
        let (start, end) = match (g_interval.start, g_interval.end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(Error::MissingGenomeIntervalPosition(format!(
                    "{}:{}",
                    self.alt_ac, g_interval
                )))
            }
        };

        let grs = start - 1 - self.gc_offset;
        let gre = end - 1 - self.gc_offset;
        if self.config.strict_bounds && !self.is_g_interval_in_bounds(g_interval) {
            let pos = if grs < 0 { start } else { end };
            return Err(Error::PositionOutOfBounds {
                ac: self.alt_ac.clone(),
                pos,
                bounds: format!(
                    "[{}, {}]",
                    self.gc_offset + 1,
                    self.gc_offset + self.cigar_mapper.ref_len
                ),
            });
        }
        if self.cigar_mapper.ref_interval_spans_skip(grs, gre) {
            return Err(Error::IntervalSpansIntron {
                ac: self.tx_ac.clone(),
                start,
                end,
            });
        }

        let strict = self.config.strict_bounds;
        let frs = self
            .cigar_mapper
            .map_ref_to_tgt(grs, IntervalEnd::Start, strict)
            .map_err(|e| self.with_tx_ac(e))?;
        let fre = self
            .cigar_mapper
            .map_ref_to_tgt(gre, IntervalEnd::End, strict)
            .map_err(|e| self.with_tx_ac(e))?;
        let is_certain = !is_gap(&frs) && !is_gap(&fre);

        let (r_start, r_end) = if self.strand == -1 {
            (self.flip(&fre), self.flip(&frs))
        } else {
            ((frs.pos, frs.offset), (fre.pos, fre.offset))
        };
        log::trace!("g.{}_{} -> r0 {:?}_{:?}", start, end, r_start, r_end);

        Ok(Mu::from(
            RnaInterval {
                start: RnaPos {
                    base: zbc_to_hgvs(r_start.0),
                    offset: none_if_default(r_start.1),
                },
                end: RnaPos {
                    base: zbc_to_hgvs(r_end.0),
                    offset: none_if_default(r_end.1),
                },
            },
            is_certain,
        ))
    }

    /// Flip a mapped position to transcript orientation on the reverse strand.
    fn flip(&self, result: &CigarMapperResult) -> (i32, i32) {
        (self.tgt_len - 1 - result.pos, -result.offset)
    }

    /// Convert a transcript (r.) interval to a genomic (g.) interval.
    pub fn r_to_g(&self, r_interval: &RnaInterval) -> Result<Mu<GenomeInterval>, Error> {
        for pos in [&r_interval.start, &r_interval.end] {
            if self.config.strict_bounds && (pos.base < 1 || pos.base > self.tgt_len) {
                return Err(self.out_of_bounds(pos.base, 1, self.tgt_len));
            }
        }

        let mut frs = hgvs_to_zbc(r_interval.start.base);
        let mut start_offset = r_interval.start.offset.unwrap_or(0);
        let mut fre = hgvs_to_zbc(r_interval.end.base);
        let mut end_offset = r_interval.end.offset.unwrap_or(0);

        if self.strand == -1 {
            (frs, fre) = (self.tgt_len - 1 - fre, self.tgt_len - 1 - frs);
            (start_offset, end_offset) = (-end_offset, -start_offset);
        }

        let strict = self.config.strict_bounds;
        let grs = self
            .cigar_mapper
            .map_tgt_to_ref(frs, IntervalEnd::Start, strict)
            .map_err(|e| self.with_tx_ac(e))?;
        let gre = self
            .cigar_mapper
            .map_tgt_to_ref(fre, IntervalEnd::End, strict)
            .map_err(|e| self.with_tx_ac(e))?;
        let is_certain = !is_gap(&grs) && !is_gap(&gre);

        let grs = grs.pos + start_offset;
        let gre = gre.pos + end_offset;
        if self.cigar_mapper.ref_interval_spans_skip(grs, gre) {
            return Err(Error::IntervalSpansIntron {
                ac: self.tx_ac.clone(),
                start: r_interval.start.base,
                end: r_interval.end.base,
            });
        }

        Ok(Mu::from(
            GenomeInterval {
                start: Some(grs + self.gc_offset + 1),
                end: Some(gre + self.gc_offset + 1),
            },
            is_certain,
        ))
    }

    fn cds_bounds(&self) -> Result<(i32, i32), Error> {
        match (self.cds_start_i, self.cds_end_i) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err(Error::CdsUndefined(self.tx_ac.clone())),
        }
    }

    fn pos_r_to_c(&self, pos: &RnaPos) -> Result<CdsPos, Error> {
        let (cds_start_i, cds_end_i) = self.cds_bounds()?;
        if self.config.strict_bounds && (pos.base <= 0 || pos.base > self.tgt_len) {
            return Err(self.out_of_bounds(pos.base, 1, self.tgt_len));
        }

        let (base, cds_from) = if pos.base <= cds_start_i {
            (
                pos.base - cds_start_i - if pos.base > 0 { 1 } else { 0 },
                CdsFrom::Start,
            )
        } else if pos.base <= cds_end_i {
            (pos.base - cds_start_i, CdsFrom::Start)
        } else {
            (pos.base - cds_end_i, CdsFrom::End)
        };

        Ok(CdsPos {
            base,
            offset: pos.offset,
            cds_from,
        })
    }

    /// Convert a transcript (r.) interval to a coding (c.) interval.
    pub fn r_to_c(&self, r_interval: &RnaInterval) -> Result<CdsInterval, Error> {
        Ok(CdsInterval {
            start: self.pos_r_to_c(&r_interval.start)?,
            end: self.pos_r_to_c(&r_interval.end)?,
        })
    }

    fn pos_c_to_r(&self, pos: &CdsPos) -> Result<RnaPos, Error> {
        let (cds_start_i, cds_end_i) = self.cds_bounds()?;
        let cds_len = cds_end_i - cds_start_i;
        let r = match pos.cds_from {
            // Positions after the last CDS base are written c.*N.
            CdsFrom::Start if pos.base > cds_len => {
                return Err(Error::PositionOutOfBounds {
                    ac: self.tx_ac.clone(),
                    pos: pos.base,
                    bounds: format!("[1, {cds_len}]"),
                });
            }
            CdsFrom::Start => pos.base + cds_start_i + if pos.base < 0 { 1 } else { 0 },
            CdsFrom::End => pos.base + cds_end_i,
        };
        let r = if r <= 0 { r - 1 } else { r };
        if self.config.strict_bounds && (r <= 0 || r > self.tgt_len) {
            return Err(Error::PositionOutOfBounds {
                ac: self.tx_ac.clone(),
                pos: pos.base,
                bounds: format!(
                    "[{}, *{}]",
                    -cds_start_i,
                    self.tgt_len - cds_end_i
                ),
            });
        }

        Ok(RnaPos {
            base: r,
            offset: pos.offset,
        })
    }

    /// Convert a coding (c.) interval to a transcript (r.) interval.
    pub fn c_to_r(&self, c_interval: &CdsInterval) -> Result<RnaInterval, Error> {
        Ok(RnaInterval {
            start: self.pos_c_to_r(&c_interval.start)?,
            end: self.pos_c_to_r(&c_interval.end)?,
        })
    }

    /// Convert a genomic (g.) interval to a coding (c.) interval.
    pub fn g_to_c(&self, g_interval: &GenomeInterval) -> Result<Mu<CdsInterval>, Error> {
        self.cds_bounds()?;
        self.g_to_r(g_interval)?
            .try_map(|r_interval| self.r_to_c(&r_interval))
    }

    /// Convert a coding (c.) interval to a genomic (g.) interval.
    pub fn c_to_g(&self, c_interval: &CdsInterval) -> Result<Mu<GenomeInterval>, Error> {
        self.r_to_g(&self.c_to_r(c_interval)?)
    }
}

fn is_gap(result: &CigarMapperResult) -> bool {
    matches!(result.cigar_op, CigarOp::Del | CigarOp::Ins)
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
