//! CIGAR strings describing transcript-to-genome alignments and the `CigarMapper`.

use std::fmt::Display;

use nom::{combinator::all_consuming, multi::many0, Parser};

use crate::mapper::Error;

/// CIGAR operation of an exon alignment.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum CigarOp {
    /// =
    Eq,
    /// D
    Del,
    /// I
    Ins,
    /// M
    Match,
    /// N
    Skip,
    /// X
    Mismatch,
}

impl CigarOp {
    /// Whether the operation consumes genome (reference) positions.
    pub fn is_advance_ref(&self) -> bool {
        matches!(
            self,
            CigarOp::Eq | CigarOp::Match | CigarOp::Mismatch | CigarOp::Ins | CigarOp::Skip
        )
    }

    /// Whether the operation consumes transcript (target) positions.
    pub fn is_advance_tgt(&self) -> bool {
        matches!(
            self,
            CigarOp::Eq | CigarOp::Match | CigarOp::Mismatch | CigarOp::Del
        )
    }

    fn is_aligned(&self) -> bool {
        matches!(self, CigarOp::Eq | CigarOp::Match | CigarOp::Mismatch)
    }
}

impl TryFrom<char> for CigarOp {
    type Error = Error;

    fn try_from(value: char) -> Result<Self, Error> {
        Ok(match value {
            '=' => Self::Eq,
            'D' => Self::Del,
            'I' => Self::Ins,
            'M' => Self::Match,
            'N' => Self::Skip,
            'X' => Self::Mismatch,
            _ => return Err(Error::InvalidCigarString(value.to_string())),
        })
    }
}

impl From<CigarOp> for char {
    fn from(val: CigarOp) -> Self {
        match val {
            CigarOp::Eq => '=',
            CigarOp::Del => 'D',
            CigarOp::Ins => 'I',
            CigarOp::Match => 'M',
            CigarOp::Skip => 'N',
            CigarOp::Mismatch => 'X',
        }
    }
}

impl Display for CigarOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

/// CIGAR element consisting of count and CIGAR operation.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct CigarElement {
    pub count: i32,
    pub op: CigarOp,
}

impl Display for CigarElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count > 1 {
            write!(f, "{}", self.count)?;
        }
        write!(f, "{}", self.op)
    }
}

/// A sequence of CIGAR elements.
#[derive(Debug, PartialEq, Default, Clone)]
pub struct CigarString {
    pub elems: Vec<CigarElement>,
}

impl CigarString {
    pub fn from(elems: Vec<CigarElement>) -> Self {
        Self { elems }
    }
}

impl std::ops::Deref for CigarString {
    type Target = Vec<CigarElement>;
    fn deref(&self) -> &Self::Target {
        &self.elems
    }
}

impl std::ops::DerefMut for CigarString {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.elems
    }
}

impl Display for CigarString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for item in &self.elems {
            write!(f, "{}", &item)?
        }
        Ok(())
    }
}

pub mod parse {
    use nom::{
        bytes::complete::take_while_m_n, character::complete::digit0, error::context,
        sequence::pair, IResult, Parser,
    };
    use nom_language::error::VerboseError;

    type Res<T, U> = IResult<T, U, VerboseError<T>>;

    pub fn is_cigar_op_char(c: char) -> bool {
        "=DIMNX".contains(c)
    }

    /// Parse one element into its (possibly empty) count and the operation character.
    pub fn cigar_element(input: &str) -> Res<&str, (&str, &str)> {
        context(
            "cigar_element",
            pair(digit0, take_while_m_n(1, 1, is_cigar_op_char)),
        )
        .parse(input)
    }
}

/// Parse a CIGAR string such as `"194=1D60=1D184="`; a missing count means one.
pub fn parse_cigar_string(input: &str) -> Result<CigarString, Error> {
    let (_, raw) = all_consuming(many0(parse::cigar_element))
        .parse(input)
        .map_err(|e| Error::InvalidCigarString(format!("{input}: {e}")))?;

    let mut elems = Vec::with_capacity(raw.len());
    for (count, op) in raw {
        let count = if count.is_empty() {
            1
        } else {
            count
                .parse::<i32>()
                .map_err(|e| Error::InvalidCigarString(format!("{input}: {e}")))?
        };
        let op = op
            .chars()
            .next()
            .ok_or_else(|| Error::InvalidCigarString(input.to_string()))?
            .try_into()?;
        elems.push(CigarElement { count, op });
    }

    Ok(CigarString::from(elems))
}

/// Which end of an interval a position belongs to.
///
/// Positions inside insertions and deletions map to the base before (`Start`) or after
/// (`End`) the gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalEnd {
    Start,
    End,
}

/// Coordinate mapping between two sequences whose alignment is given by a CIGAR string.
///
/// The reference is the genome, the target is the transcript in genome orientation.
/// Positions are interbase: zero-width boundaries between bases, so that insertions
/// between bases can be represented.
#[derive(Default, Debug, Clone)]
pub struct CigarMapper {
    pub cigar_string: CigarString,
    pub ref_pos: Vec<i32>,
    pub tgt_pos: Vec<i32>,
    pub cigar_op: Vec<CigarOp>,
    pub ref_len: i32,
    pub tgt_len: i32,
}

/// Result of mapping a single position.
#[derive(Debug, PartialEq)]
pub struct CigarMapperResult {
    pub pos: i32,
    pub offset: i32,
    pub cigar_op: CigarOp,
}

impl CigarMapper {
    pub fn new(cigar_string: &CigarString) -> Self {
        let cigar_len = cigar_string.len();
        let mut ref_pos = Vec::with_capacity(cigar_len + 1);
        let mut tgt_pos = Vec::with_capacity(cigar_len + 1);
        let mut cigar_op = Vec::with_capacity(cigar_len);

        let mut ref_cur = 0;
        let mut tgt_cur = 0;
        for CigarElement { count, op } in cigar_string.iter() {
            ref_pos.push(ref_cur);
            tgt_pos.push(tgt_cur);
            cigar_op.push(*op);
            if op.is_advance_ref() {
                ref_cur += *count;
            }
            if op.is_advance_tgt() {
                tgt_cur += *count;
            }
        }
        ref_pos.push(ref_cur);
        tgt_pos.push(tgt_cur);

        Self {
            cigar_string: cigar_string.clone(),
            ref_len: ref_cur,
            tgt_len: tgt_cur,
            ref_pos,
            tgt_pos,
            cigar_op,
        }
    }

    pub fn map_ref_to_tgt(
        &self,
        pos: i32,
        end: IntervalEnd,
        strict_bounds: bool,
    ) -> Result<CigarMapperResult, Error> {
        self.map(&self.ref_pos, &self.tgt_pos, pos, end, strict_bounds)
    }

    pub fn map_tgt_to_ref(
        &self,
        pos: i32,
        end: IntervalEnd,
        strict_bounds: bool,
    ) -> Result<CigarMapperResult, Error> {
        self.map(&self.tgt_pos, &self.ref_pos, pos, end, strict_bounds)
    }

    /// Whether the 0-based reference interval `[start, end]` contains a whole skipped region.
    ///
    /// Intervals that merely start or end inside a skip are fine, e.g. `c.100_100+5`.
    pub fn ref_interval_spans_skip(&self, start: i32, end: i32) -> bool {
        let (start, end) = (start.min(end), start.max(end));
        let start_i = self.segment_index(&self.ref_pos, start);
        let end_i = self.segment_index(&self.ref_pos, end);
        (start_i + 1..end_i).any(|i| self.cigar_op[i] == CigarOp::Skip)
    }

    /// Index of the segment containing `pos`; positions outside of the alignment are
    /// assigned to the first or last segment.
    fn segment_index(&self, from_pos: &[i32], pos: i32) -> usize {
        let pos_i = from_pos[1..]
            .iter()
            .position(|&seg_end| pos < seg_end)
            .unwrap_or(self.cigar_op.len());
        pos_i.min(self.cigar_op.len().saturating_sub(1))
    }

    /// Map position between aligned segments.
    ///
    /// Positions in this function are 0-based, base-counting.
    fn map(
        &self,
        from_pos: &[i32],
        to_pos: &[i32],
        pos: i32,
        end: IntervalEnd,
        strict_bounds: bool,
    ) -> Result<CigarMapperResult, Error> {
        let from_len = from_pos.last().copied().unwrap_or_default();
        if self.cigar_op.is_empty() || (strict_bounds && (pos < 0 || pos > from_len)) {
            return Err(Error::PositionOutOfBounds {
                ac: self.cigar_string.to_string(),
                pos,
                bounds: format!("[0, {from_len}]"),
            });
        }

        let pos_i = self.segment_index(from_pos, pos);
        let cigar_op = self.cigar_op[pos_i];
        log::trace!("mapping {pos} in segment {pos_i} ({cigar_op})");

        let (pos, offset) = if cigar_op.is_aligned() {
            (to_pos[pos_i] + (pos - from_pos[pos_i]), 0)
        } else if cigar_op == CigarOp::Skip {
            // Skips map to the closest boundary, with the distance as offset.
            if pos - from_pos[pos_i] < from_pos[pos_i + 1] - pos {
                (to_pos[pos_i] - 1, pos - from_pos[pos_i] + 1)
            } else {
                (to_pos[pos_i], -(from_pos[pos_i + 1] - pos))
            }
        } else {
            match end {
                IntervalEnd::Start => (to_pos[pos_i] - 1, 0),
                IntervalEnd::End => (to_pos[pos_i], 0),
            }
        };

        Ok(CigarMapperResult {
            pos,
            offset,
            cigar_op,
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
