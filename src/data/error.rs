//! Error type definition.

use thiserror::Error;

/// Error type for data.
#[derive(Error, Debug)]
pub enum Error {
    #[error("sequence operation failed")]
    SequenceOperationFailed(#[from] crate::sequences::Error),
    #[error("No sequence available for {ac} ({cause})")]
    SequenceUnavailable { ac: String, cause: String },
    #[error("could not get parent from {0}")]
    PathParent(String),
    #[error("could not get basename from {0}")]
    PathBasename(String),
    #[error("could not open cdot JSON file: {0}")]
    CdotJsonOpen(String),
    #[error("could not parse cdot JSON file {0}: {1}")]
    CdotJsonParse(String, String),
    #[error("could not read FASTA file {0}: {1}")]
    FastaRead(String, String),
    #[error("no transcript found for {0}")]
    NoTranscriptFound(String),
    #[error("no alignment found for {0} on {1}")]
    NoAlignmentFound(String, String),
    #[error("no accession for chromosome {0} in {1}")]
    NoChromosomeAccession(String, String),
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
