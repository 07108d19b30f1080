//! Implementation of operations on the data structures.

use std::ops::Deref;

use super::ds::*;

impl<T> Mu<T> {
    /// Construct from a value and a flag whether the value is certain.
    pub fn from(value: T, is_certain: bool) -> Self {
        if is_certain {
            Mu::Certain(value)
        } else {
            Mu::Uncertain(value)
        }
    }

    pub fn is_certain(&self) -> bool {
        matches!(self, Mu::Certain(_))
    }

    pub fn inner(&self) -> &T {
        match self {
            Mu::Certain(value) | Mu::Uncertain(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Mu::Certain(value) | Mu::Uncertain(value) => value,
        }
    }

    /// Apply `f` to the contained value, keeping the certainty.
    pub fn map<U, F>(self, f: F) -> Mu<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Mu::Certain(value) => Mu::Certain(f(value)),
            Mu::Uncertain(value) => Mu::Uncertain(f(value)),
        }
    }

    /// Like `map` but for a fallible `f`.
    pub fn try_map<U, E, F>(self, f: F) -> Result<Mu<U>, E>
    where
        F: FnOnce(T) -> Result<U, E>,
    {
        Ok(match self {
            Mu::Certain(value) => Mu::Certain(f(value)?),
            Mu::Uncertain(value) => Mu::Uncertain(f(value)?),
        })
    }
}

impl Accession {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

impl Deref for Accession {
    type Target = String;
    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl GeneSymbol {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

impl HgvsVariant {
    /// Return the accession of the reference sequence.
    pub fn accession(&self) -> &Accession {
        match self {
            HgvsVariant::CdsVariant { accession, .. }
            | HgvsVariant::GenomeVariant { accession, .. }
            | HgvsVariant::ProtVariant { accession, .. }
            | HgvsVariant::RnaVariant { accession, .. } => accession,
        }
    }

    /// Return the gene symbol, if any.
    pub fn gene_symbol(&self) -> &Option<GeneSymbol> {
        match self {
            HgvsVariant::CdsVariant { gene_symbol, .. }
            | HgvsVariant::GenomeVariant { gene_symbol, .. }
            | HgvsVariant::ProtVariant { gene_symbol, .. }
            | HgvsVariant::RnaVariant { gene_symbol, .. } => gene_symbol,
        }
    }

    /// Return the coordinate system of the variant.
    pub fn variant_type(&self) -> VariantType {
        match self {
            HgvsVariant::CdsVariant { .. } => VariantType::Cds,
            HgvsVariant::GenomeVariant { .. } => VariantType::Genome,
            HgvsVariant::ProtVariant { .. } => VariantType::Protein,
            HgvsVariant::RnaVariant { .. } => VariantType::Rna,
        }
    }

    /// Return the nucleic acid edit; `None` for protein variants.
    pub fn na_edit(&self) -> Option<&Mu<NaEdit>> {
        match self {
            HgvsVariant::CdsVariant { loc_edit, .. } => Some(&loc_edit.edit),
            HgvsVariant::GenomeVariant { loc_edit, .. } => Some(&loc_edit.edit),
            HgvsVariant::RnaVariant { loc_edit, .. } => Some(&loc_edit.edit),
            HgvsVariant::ProtVariant { .. } => None,
        }
    }

    /// Return a copy with the gene symbol replaced.
    pub fn with_gene_symbol(self, value: Option<GeneSymbol>) -> Self {
        match self {
            HgvsVariant::CdsVariant {
                accession,
                loc_edit,
                ..
            } => HgvsVariant::CdsVariant {
                accession,
                gene_symbol: value,
                loc_edit,
            },
            HgvsVariant::GenomeVariant {
                accession,
                loc_edit,
                ..
            } => HgvsVariant::GenomeVariant {
                accession,
                gene_symbol: value,
                loc_edit,
            },
            HgvsVariant::ProtVariant {
                accession,
                loc_edit,
                ..
            } => HgvsVariant::ProtVariant {
                accession,
                gene_symbol: value,
                loc_edit,
            },
            HgvsVariant::RnaVariant {
                accession,
                loc_edit,
                ..
            } => HgvsVariant::RnaVariant {
                accession,
                gene_symbol: value,
                loc_edit,
            },
        }
    }
}

impl NaEdit {
    /// Whether this is the reference/alternative form the mappers currently support.
    pub fn is_ref_alt(&self) -> bool {
        matches!(self, NaEdit::RefAlt { .. })
    }
}

impl CdsPos {
    /// Position relative to the CDS start without intronic offset.
    pub fn new(base: i32) -> Self {
        Self {
            base,
            offset: None,
            cds_from: CdsFrom::Start,
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn var_c() -> HgvsVariant {
        HgvsVariant::CdsVariant {
            accession: Accession::new("NM_001637.3"),
            gene_symbol: None,
            loc_edit: CdsLocEdit {
                loc: Mu::Certain(CdsInterval {
                    start: CdsPos::new(1582),
                    end: CdsPos::new(1582),
                }),
                edit: Mu::Certain(NaEdit::RefAlt {
                    reference: "G".to_string(),
                    alternative: "A".to_string(),
                }),
            },
        }
    }

    #[test]
    fn mu_operations() {
        let mu = Mu::from(1, false);
        assert_eq!(mu, Mu::Uncertain(1));
        assert!(!mu.is_certain());
        assert_eq!(*mu.inner(), 1);
        assert_eq!(mu.clone().map(|x| x + 1), Mu::Uncertain(2));
        assert_eq!(
            Mu::Certain(2).try_map(|x| if x > 1 { Ok(x * 2) } else { Err(()) }),
            Ok(Mu::Certain(4))
        );
        assert_eq!(mu.into_inner(), 1);
    }

    #[test]
    fn accessors() {
        let var = var_c();
        assert_eq!(var.accession().as_str(), "NM_001637.3");
        assert_eq!(var.variant_type(), VariantType::Cds);
        assert_eq!(var.gene_symbol(), &None);
        assert!(var.na_edit().map(|e| e.inner().is_ref_alt()).unwrap_or(false));

        let var = var.with_gene_symbol(Some(GeneSymbol::new("AOAH")));
        assert_eq!(var.gene_symbol(), &Some(GeneSymbol::new("AOAH")));
        assert_eq!(var.variant_type(), VariantType::Cds);
    }

    #[test]
    fn protein_variant_has_no_na_edit() {
        let var = HgvsVariant::ProtVariant {
            accession: Accession::new("NP_001628.1"),
            gene_symbol: None,
            loc_edit: ProtLocEdit::Unknown,
        };
        assert_eq!(var.na_edit(), None);
        assert_eq!(var.variant_type(), VariantType::Protein);
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
