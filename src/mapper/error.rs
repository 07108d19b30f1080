//! Error type definition.

use thiserror::Error;

use crate::variant::VariantType;

/// Error type for variant mapping.
#[derive(Error, Debug)]
pub enum Error {
    #[error("expected a {expected}. variant but received {actual}. variant: {variant}")]
    InvalidHgvsVariant {
        expected: VariantType,
        actual: VariantType,
        variant: String,
    },
    #[error("edit {edit} is not supported for {conversion}")]
    UnsupportedEditType { edit: String, conversion: String },
    #[error("transcript data not available")]
    TranscriptDataUnavailable(#[source] crate::data::error::Error),
    #[error("No sequence available for {ac} ({cause})")]
    SequenceDataUnavailable { ac: String, cause: String },
    #[error("invalid sequence")]
    InvalidSequence(#[from] crate::sequences::Error),
    #[error("position {pos} is out of the bounds {bounds} of {ac}")]
    PositionOutOfBounds { ac: String, pos: i32, bounds: String },
    #[error("interval {start}_{end} on {ac} spans an intron boundary")]
    IntervalSpansIntron { ac: String, start: i32, end: i32 },
    #[error("CDS is undefined for {0}; cannot map to c. coordinates (non-coding transcript?)")]
    CdsUndefined(String),
    #[error("CDS start and end must both be defined or undefined for {0}")]
    InconsistentCdsStartEnd(String),
    #[error("strand of {ac} must be 1 or -1 but is {strand}")]
    InvalidStrand { ac: String, strand: i16 },
    #[error("found no exons for {0}")]
    NoExons(String),
    #[error("non-adjacent exons for {0}: {1}")]
    NonAdjacentExons(String, String),
    #[error("invalid CIGAR string: {0}")]
    InvalidCigarString(String),
    #[error("cannot project genome interval with missing start or end position: {0}")]
    MissingGenomeIntervalPosition(String),
    #[error("reference {stated} does not match transcript sequence {actual} at c.{pos} of {ac}")]
    ReferenceMismatch {
        ac: String,
        pos: String,
        stated: String,
        actual: String,
    },
    #[error(
        "transcript {0} is not supported because its CDS length of {1} is not a multiple of 3"
    )]
    TranscriptLengthInvalid(String, usize),
    #[error("{tx_ac} is aligned to {alt_ac} but the variant is on {ac}")]
    GenomeAccessionMismatch {
        tx_ac: String,
        alt_ac: String,
        ac: String,
    },
    #[error("could not construct a protein variant for {0}")]
    ProtVariantConstructionFailed(String),
}

impl From<crate::data::error::Error> for Error {
    fn from(value: crate::data::error::Error) -> Self {
        match value {
            crate::data::error::Error::SequenceUnavailable { ac, cause } => {
                Error::SequenceDataUnavailable { ac, cause }
            }
            other => Error::TranscriptDataUnavailable(other),
        }
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
