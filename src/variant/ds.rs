//! Data structures for representing HGVS variant descriptions.

/// Expression of "maybe uncertain".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mu<T> {
    /// Certain variant of `T`.
    Certain(T),
    /// Uncertain variant of `T`.
    Uncertain(T),
}

/// Representation of gene symbol, e.g., `TTN` or `Ttn`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneSymbol {
    pub value: String,
}

/// Representation of accession, e.g., `NM_01234.5`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Accession {
    pub value: String,
}

/// The coordinate system of a variant, rendered as the HGVS type prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariantType {
    /// `g.`
    Genome,
    /// `c.`
    Cds,
    /// `r.`
    Rna,
    /// `p.`
    Protein,
}

/// Edit of nucleic acids.
///
/// This is a closed set; code that maps variants between coordinate systems matches on
/// it exhaustively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NaEdit {
    /// A substitution where both reference and alternative allele are nucleic acid strings.
    ///
    /// One base each is a single nucleotide substitution, anything else a deletion-insertion.
    RefAlt {
        reference: String,
        alternative: String,
    },
    /// Deletion of one or more nucleic acid characters.
    Del { reference: String },
    /// Insertion of one or more nucleic acid characters.
    Ins { alternative: String },
    /// Duplication of nucleic acid reference sequence.
    Dup { reference: String },
    /// Repeated unit with a (possibly uncertain) number of copies.
    Repeat { reference: String, min: i32, max: i32 },
}

/// Uncertain change through extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UncertainLengthChange {
    None,
    Unknown,
    Known(i32),
}

/// Protein edit with interval end edit.
///
/// Amino acids are stored as 1-letter codes and rendered with 3-letter codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProteinEdit {
    Fs {
        alternative: Option<String>,
        terminal: Option<String>,
        length: UncertainLengthChange,
    },
    Ext {
        /// Amino acid before "ext"
        aa_ext: Option<String>,
        /// Amino acid after "ext", terminal if shift is positive.
        ext_aa: Option<String>,
        /// Change in protein length.
        change: UncertainLengthChange,
    },
    Subst {
        alternative: String,
    },
    /// `delins`
    DelIns {
        alternative: String,
    },
    /// `ins`
    Ins {
        alternative: String,
    },
    /// `del`
    Del,
    /// `dup`
    Dup,
    /// `=`
    Ident,
}

/// A HGVS variant specification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HgvsVariant {
    /// Variant specification with `c.` location.
    CdsVariant {
        accession: Accession,
        gene_symbol: Option<GeneSymbol>,
        loc_edit: CdsLocEdit,
    },
    /// Variant specification with `g.` location.
    GenomeVariant {
        accession: Accession,
        gene_symbol: Option<GeneSymbol>,
        loc_edit: GenomeLocEdit,
    },
    /// Variant specification with `p.` location.
    ProtVariant {
        accession: Accession,
        gene_symbol: Option<GeneSymbol>,
        loc_edit: ProtLocEdit,
    },
    /// Variant specification with `r.` location.
    RnaVariant {
        accession: Accession,
        gene_symbol: Option<GeneSymbol>,
        loc_edit: RnaLocEdit,
    },
}

/// Coding sequence location with edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CdsLocEdit {
    /// Location on the CDS.
    pub loc: Mu<CdsInterval>,
    /// DNA change description.
    pub edit: Mu<NaEdit>,
}

/// CDS position interval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CdsInterval {
    /// Start position
    pub start: CdsPos,
    /// End position
    pub end: CdsPos,
}

/// Specifies whether the CDS position is relative to the CDS start or
/// CDS end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CdsFrom {
    Start,
    End,
}

/// CDS position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CdsPos {
    /// Base position.
    pub base: i32,
    /// Optional offset.
    pub offset: Option<i32>,
    /// Whether starts at CDS start or end.
    pub cds_from: CdsFrom,
}

/// Genome sequence location with edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenomeLocEdit {
    /// Location on the genome.
    pub loc: Mu<GenomeInterval>,
    /// DNA change description.
    pub edit: Mu<NaEdit>,
}

/// Genome position interval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenomeInterval {
    /// Start position
    pub start: Option<i32>,
    /// End position
    pub end: Option<i32>,
}

/// RNA sequence location with edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RnaLocEdit {
    /// Location on a transcript.
    pub loc: Mu<RnaInterval>,
    /// RNA change description.
    pub edit: Mu<NaEdit>,
}

/// RNA position interval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RnaInterval {
    /// Start position
    pub start: RnaPos,
    /// End position
    pub end: RnaPos,
}

/// RNA position, relative to the first transcribed base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RnaPos {
    /// Base position.
    pub base: i32,
    /// Optional offset.
    pub offset: Option<i32>,
}

/// Protein sequence location with edit or special.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProtLocEdit {
    Ordinary {
        loc: Mu<ProtInterval>,
        edit: Mu<ProteinEdit>,
    },
    /// `=`
    NoChange,
    /// `0`
    NoProtein,
    /// `?`
    Unknown,
    /// `Met1?`
    InitiationUncertain,
}

/// Protein position interval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtInterval {
    /// Start position
    pub start: ProtPos,
    /// End position
    pub end: ProtPos,
}

/// Protein position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtPos {
    /// Amino acid value (1-letter code).
    pub aa: String,
    /// Number of `aa`.
    pub number: i32,
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
