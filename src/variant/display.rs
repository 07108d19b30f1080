//! Implementation of Display trait.

use std::fmt::Display;

use crate::{sequences::aa1_to_aa3, variant::ds::*};

/// Render 1-letter amino acids with 3-letter codes, leaving unknown input as is.
fn aa3(aa: &str) -> String {
    aa1_to_aa3(aa).unwrap_or_else(|_| aa.to_string())
}

impl<T> Display for Mu<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mu::Certain(value) => write!(f, "{value}"),
            Mu::Uncertain(value) => write!(f, "({value})"),
        }
    }
}

impl Display for GeneSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Display for Accession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Display for VariantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            VariantType::Genome => "g",
            VariantType::Cds => "c",
            VariantType::Rna => "r",
            VariantType::Protein => "p",
        };
        write!(f, "{value}")
    }
}

impl Display for NaEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NaEdit::RefAlt {
                reference,
                alternative,
            } => match (reference.len(), alternative.len()) {
                _ if reference == alternative => write!(f, "="),
                (1, 1) => write!(f, "{reference}>{alternative}"),
                (_, 0) => write!(f, "del{reference}"),
                (_, _) => write!(f, "delins{alternative}"),
            },
            NaEdit::Del { reference } => write!(f, "del{reference}"),
            NaEdit::Ins { alternative } => write!(f, "ins{alternative}"),
            NaEdit::Dup { reference } => write!(f, "dup{reference}"),
            NaEdit::Repeat {
                reference,
                min,
                max,
            } => {
                if min == max {
                    write!(f, "{reference}[{min}]")
                } else {
                    write!(f, "{reference}[({min}_{max})]")
                }
            }
        }
    }
}

impl Display for UncertainLengthChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UncertainLengthChange::None => write!(f, ""),
            UncertainLengthChange::Unknown => write!(f, "?"),
            UncertainLengthChange::Known(count) => write!(f, "{count}"),
        }
    }
}

impl Display for ProteinEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProteinEdit::Fs {
                alternative,
                terminal,
                length,
            } => {
                if let Some(alt) = alternative {
                    write!(f, "{}", aa3(alt))?;
                }
                write!(f, "fs")?;
                if let Some(ter) = terminal {
                    write!(f, "{}", aa3(ter))?;
                }
                write!(f, "{length}")
            }
            ProteinEdit::Ext {
                aa_ext,
                ext_aa,
                change,
            } => {
                if let Some(alt) = aa_ext {
                    write!(f, "{}", aa3(alt))?;
                }
                write!(f, "ext")?;
                if let Some(ter) = ext_aa {
                    write!(f, "{}", aa3(ter))?;
                }
                write!(f, "{change}")
            }
            ProteinEdit::Subst { alternative } => {
                if alternative.is_empty() {
                    write!(f, "=")
                } else {
                    write!(f, "{}", aa3(alternative))
                }
            }
            ProteinEdit::DelIns { alternative } => write!(f, "delins{}", aa3(alternative)),
            ProteinEdit::Ins { alternative } => write!(f, "ins{}", aa3(alternative)),
            ProteinEdit::Del => write!(f, "del"),
            ProteinEdit::Dup => write!(f, "dup"),
            ProteinEdit::Ident => write!(f, "="),
        }
    }
}

impl Display for ProtPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", aa3(&self.aa), self.number)
    }
}

impl Display for ProtInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.start)?;
        if self.start != self.end {
            write!(f, "_{}", self.end)?;
        }
        Ok(())
    }
}

impl Display for ProtLocEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtLocEdit::Ordinary { loc, edit } => write!(f, "{loc}{edit}"),
            ProtLocEdit::NoChange => write!(f, "="),
            ProtLocEdit::NoProtein => write!(f, "0"),
            ProtLocEdit::Unknown => write!(f, "?"),
            ProtLocEdit::InitiationUncertain => write!(f, "Met1?"),
        }
    }
}

impl Display for CdsLocEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.loc, self.edit)
    }
}

impl Display for CdsInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.start)?;
        if self.start != self.end {
            write!(f, "_{}", self.end)?;
        }
        Ok(())
    }
}

/// Write the `+5` / `-3` intronic offset, if any.
fn write_offset(f: &mut std::fmt::Formatter<'_>, offset: Option<i32>) -> std::fmt::Result {
    match offset {
        Some(offset) if offset > 0 => write!(f, "+{offset}"),
        Some(offset) if offset < 0 => write!(f, "{offset}"),
        _ => Ok(()),
    }
}

impl Display for CdsPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cds_from == CdsFrom::End {
            write!(f, "*")?;
        }
        write!(f, "{}", self.base)?;
        write_offset(f, self.offset)
    }
}

impl Display for RnaLocEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.loc, self.edit)
    }
}

impl Display for RnaInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.start)?;
        if self.start != self.end {
            write!(f, "_{}", self.end)?;
        }
        Ok(())
    }
}

impl Display for RnaPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.base)?;
        write_offset(f, self.offset)
    }
}

impl Display for GenomeLocEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.loc, self.edit)
    }
}

impl Display for GenomeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.start {
            Some(start) => write!(f, "{start}")?,
            None => write!(f, "?")?,
        }
        if self.start != self.end {
            match self.end {
                Some(end) => write!(f, "_{end}")?,
                None => write!(f, "_?")?,
            }
        }
        Ok(())
    }
}

impl Display for HgvsVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.accession())?;
        if let Some(gene_symbol) = self.gene_symbol() {
            write!(f, "({gene_symbol})")?;
        }
        write!(f, ":{}.", self.variant_type())?;
        match self {
            HgvsVariant::CdsVariant { loc_edit, .. } => write!(f, "{loc_edit}"),
            HgvsVariant::GenomeVariant { loc_edit, .. } => write!(f, "{loc_edit}"),
            HgvsVariant::ProtVariant { loc_edit, .. } => write!(f, "{loc_edit}"),
            HgvsVariant::RnaVariant { loc_edit, .. } => write!(f, "{loc_edit}"),
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
