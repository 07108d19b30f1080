//! Strand-aware transformation of nucleic acid edits.

use crate::{
    sequences::{revcomp, Error},
    variant::{Mu, NaEdit},
};

/// Reverse-complement all sequence literals of `edit`.
///
/// Repeat counts are kept; only the repeat unit is complemented.
pub fn reverse_complement_edit(edit: &NaEdit) -> Result<NaEdit, Error> {
    Ok(match edit {
        NaEdit::RefAlt {
            reference,
            alternative,
        } => NaEdit::RefAlt {
            reference: revcomp(reference)?,
            alternative: revcomp(alternative)?,
        },
        NaEdit::Del { reference } => NaEdit::Del {
            reference: revcomp(reference)?,
        },
        NaEdit::Ins { alternative } => NaEdit::Ins {
            alternative: revcomp(alternative)?,
        },
        NaEdit::Dup { reference } => NaEdit::Dup {
            reference: revcomp(reference)?,
        },
        NaEdit::Repeat {
            reference,
            min,
            max,
        } => NaEdit::Repeat {
            reference: revcomp(reference)?,
            min: *min,
            max: *max,
        },
    })
}

/// Convert `edit` into the orientation of a sequence on `strand`, keeping its certainty.
pub fn convert_edit_check_strand(strand: i16, edit: &Mu<NaEdit>) -> Result<Mu<NaEdit>, Error> {
    if strand == 1 {
        Ok(edit.clone())
    } else {
        edit.clone().try_map(|edit| reverse_complement_edit(&edit))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn ref_alt(reference: &str, alternative: &str) -> NaEdit {
        NaEdit::RefAlt {
            reference: reference.to_string(),
            alternative: alternative.to_string(),
        }
    }

    #[rstest]
    #[case(ref_alt("C", "T"), ref_alt("G", "A"))]
    #[case(ref_alt("CAG", "T"), ref_alt("CTG", "A"))]
    #[case(ref_alt("", "AAC"), ref_alt("", "GTT"))]
    #[case(ref_alt("acgN", "R"), ref_alt("Ncgt", "Y"))]
    #[case(NaEdit::Del { reference: "AAC".to_string() }, NaEdit::Del { reference: "GTT".to_string() })]
    #[case(NaEdit::Ins { alternative: "GA".to_string() }, NaEdit::Ins { alternative: "TC".to_string() })]
    #[case(NaEdit::Dup { reference: "T".to_string() }, NaEdit::Dup { reference: "A".to_string() })]
    #[case(
        NaEdit::Repeat { reference: "CAG".to_string(), min: 3, max: 5 },
        NaEdit::Repeat { reference: "CTG".to_string(), min: 3, max: 5 }
    )]
    fn reverse_complement(#[case] edit: NaEdit, #[case] expected: NaEdit) -> Result<(), Error> {
        let rc = reverse_complement_edit(&edit)?;
        assert_eq!(rc, expected);
        assert_eq!(reverse_complement_edit(&rc)?, edit);

        Ok(())
    }

    #[test]
    fn reverse_complement_rejects_non_nucleotides() {
        assert!(matches!(
            reverse_complement_edit(&ref_alt("C", "Z")),
            Err(Error::InvalidNucleotide(_, 'Z', 0))
        ));
        assert!(reverse_complement_edit(&ref_alt("U", "A")).is_err());
    }

    #[test]
    fn strand_check() -> Result<(), Error> {
        let edit = Mu::Uncertain(ref_alt("C", "T"));
        assert_eq!(convert_edit_check_strand(1, &edit)?, edit);
        assert_eq!(
            convert_edit_check_strand(-1, &edit)?,
            Mu::Uncertain(ref_alt("G", "A"))
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
