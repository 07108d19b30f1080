//! Utility code for working with nucleotide and amino acid sequences.
//!
//! Partially ported over from `bioutils.sequences`.

use md5::{Digest, Md5};

pub use crate::sequences::error::Error;

mod error {
    /// Error type for sequence operations.
    #[derive(thiserror::Error, Debug, Clone, PartialEq)]
    pub enum Error {
        #[error("invalid nucleotide {1:?} at position {2} in sequence {0:?}")]
        InvalidNucleotide(String, char, usize),
        #[error("invalid 1-letter aminoacid: {0} at {1}")]
        InvalidOneLetterAminoAcid(String, usize),
        #[error("codon is undefined in codon table: {0}")]
        UndefinedCodon(String),
        #[error("can only translate DNA sequences whose length is multiple of 3, but is: {0}")]
        UntranslatableDnaLength(usize),
        #[error("character is not alphabetic: {0}")]
        NotAlphabetic(char),
        #[error("could not encode digest: {0}")]
        DigestEncoding(String),
    }
}

/// IUPAC nucleotide codes accepted in edit literals.
static IUPAC_DNA: &[u8] = b"ACGTMRWSYKVHDBNacgtmrwsykvhdbn";

/// Check that `seq` only consists of IUPAC DNA characters.
pub fn validate_dna(seq: &str) -> Result<(), Error> {
    match seq
        .bytes()
        .enumerate()
        .find(|(_, c)| !IUPAC_DNA.contains(c))
    {
        Some((i, c)) => Err(Error::InvalidNucleotide(seq.to_string(), c as char, i)),
        None => Ok(()),
    }
}

/// Reverse complement of an IUPAC DNA sequence.
///
/// Ambiguity codes are complemented (`R <-> Y`, `K <-> M`, `B <-> V`, `D <-> H`) and the
/// case of each character is kept.  Anything outside of the IUPAC DNA alphabet yields
/// `Error::InvalidNucleotide`.
pub fn revcomp(seq: &str) -> Result<String, Error> {
    validate_dna(seq)?;
    // Validated ASCII in, ASCII out.
    Ok(bio::alphabets::dna::revcomp(seq.as_bytes())
        .into_iter()
        .map(char::from)
        .collect())
}

/// Standard genetic code (NCBI table 1) with codons enumerated in `TCAG` order.
static STANDARD_CODE: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

lazy_static::lazy_static! {
    /// Mapping from ASCII nucleotide to 2-bit representation in `TCAG` order, 255 if invalid.
    static ref DNA_ASCII_TO_2BIT: [u8; 256] = {
        let mut result = [255; 256];
        for (i, c) in b"TCAG".iter().enumerate() {
            result[*c as usize] = i as u8;
            result[c.to_ascii_lowercase() as usize] = i as u8;
        }
        result[b'U' as usize] = 0;
        result[b'u' as usize] = 0;
        result
    };
}

/// Expand an IUPAC nucleotide code into the concrete bases it stands for.
fn iupac_bases(c: u8) -> Option<&'static [u8]> {
    Some(match c.to_ascii_uppercase() {
        b'A' => b"A",
        b'C' => b"C",
        b'G' => b"G",
        b'T' | b'U' => b"T",
        b'M' => b"AC",
        b'R' => b"AG",
        b'W' => b"AT",
        b'S' => b"CG",
        b'Y' => b"CT",
        b'K' => b"GT",
        b'V' => b"ACG",
        b'H' => b"ACT",
        b'D' => b"AGT",
        b'B' => b"CGT",
        b'N' => b"ACGT",
        _ => return None,
    })
}

fn codon_index(codon: &[u8]) -> Option<usize> {
    codon.iter().try_fold(0usize, |acc, c| {
        match DNA_ASCII_TO_2BIT[*c as usize] {
            255 => None,
            bits => Some((acc << 2) | bits as usize),
        }
    })
}

/// Translate a single codon to its 1-letter amino acid.
///
/// Degenerate codons translate to the amino acid shared by all of their expansions, or
/// `X` if the expansions disagree.
pub fn translate_codon(codon: &[u8]) -> Result<u8, Error> {
    if let Some(idx) = codon_index(codon) {
        return Ok(STANDARD_CODE[idx]);
    }

    let undefined = || Error::UndefinedCodon(String::from_utf8_lossy(codon).to_string());
    let (a, b, c) = match codon {
        [a, b, c] => (
            iupac_bases(*a).ok_or_else(undefined)?,
            iupac_bases(*b).ok_or_else(undefined)?,
            iupac_bases(*c).ok_or_else(undefined)?,
        ),
        _ => return Err(undefined()),
    };

    let mut result = None;
    for x in a {
        for y in b {
            for z in c {
                let aa = codon_index(&[*x, *y, *z])
                    .map(|idx| STANDARD_CODE[idx])
                    .ok_or_else(undefined)?;
                match result {
                    None => result = Some(aa),
                    Some(prev) if prev != aa => return Ok(b'X'),
                    Some(_) => (),
                }
            }
        }
    }
    result.ok_or_else(undefined)
}

/// Translates a DNA or RNA sequence into a single-letter amino acid sequence.
///
/// # Args
///
/// * `seq` -- A nucleotide sequence.
/// * `full_codons` -- If `true`, forces sequence to have length that is a multiple of 3
///    and return an `Err` otherwise.  If `false`, `ter_symbol` will be added as the last
///    amino acid.
/// * `ter_symbol` -- Placeholder for the last amino acid if sequence length is not divisible
///    by three and `full_codons` is `false`.
pub fn translate_cds(seq: &str, full_codons: bool, ter_symbol: &str) -> Result<String, Error> {
    if full_codons && seq.len() % 3 != 0 {
        return Err(Error::UntranslatableDnaLength(seq.len()));
    }

    let mut result = String::with_capacity(seq.len() / 3 + 1);
    for chunk in seq.as_bytes().chunks_exact(3) {
        result.push(char::from(translate_codon(chunk)?));
    }
    if !full_codons && seq.len() % 3 != 0 {
        result.push_str(ter_symbol);
    }

    Ok(result)
}

/// Converts a 1-letter amino acid to its 3-letter code; `*` becomes `Ter`.
pub fn aa1_to_aa3_char(aa1: char) -> Option<&'static str> {
    Some(match aa1 {
        'A' => "Ala",
        'R' => "Arg",
        'N' => "Asn",
        'D' => "Asp",
        'C' => "Cys",
        'Q' => "Gln",
        'E' => "Glu",
        'G' => "Gly",
        'H' => "His",
        'I' => "Ile",
        'L' => "Leu",
        'K' => "Lys",
        'M' => "Met",
        'F' => "Phe",
        'P' => "Pro",
        'S' => "Ser",
        'T' => "Thr",
        'W' => "Trp",
        'Y' => "Tyr",
        'V' => "Val",
        'U' => "Sec",
        'B' => "Asx",
        'Z' => "Glx",
        'X' => "Xaa",
        '*' => "Ter",
        _ => return None,
    })
}

/// Converts string of 1-letter amino acids to 3-letter amino acids.
pub fn aa1_to_aa3(seq: &str) -> Result<String, Error> {
    let mut result = String::with_capacity(seq.len() * 3);
    for (i, aa1) in seq.chars().enumerate() {
        let aa3 = aa1_to_aa3_char(aa1)
            .ok_or_else(|| Error::InvalidOneLetterAminoAcid(aa1.to_string(), i + 1))?;
        result.push_str(aa3);
    }
    Ok(result)
}

/// Converts sequence to normalized representation for hashing.
///
/// Removes whitespace and asterisks, and uppercases the string.
pub fn normalize_sequence(seq: &str) -> Result<String, Error> {
    let mut result = String::with_capacity(seq.len());

    for c in seq.chars() {
        if !c.is_whitespace() && c != '*' {
            let c = c.to_ascii_uppercase();
            if c.is_alphabetic() {
                result.push(c)
            } else {
                return Err(Error::NotAlphabetic(c));
            }
        }
    }

    Ok(result)
}

/// Convert sequence to lower-case hex MD5 digest, optionally normalizing first.
pub fn seq_md5(seq: &str, normalize: bool) -> Result<String, Error> {
    let seq = if normalize {
        normalize_sequence(seq)?
    } else {
        seq.to_owned()
    };
    let mut hasher = Md5::new();
    hasher.update(seq);
    let hash = hasher.finalize();
    let mut buf = [0u8; 32];
    let checksum = base16ct::lower::encode_str(&hash, &mut buf)
        .map_err(|e| Error::DigestEncoding(e.to_string()))?;
    Ok(checksum.to_owned())
}

/// Content-addressed accession for a protein sequence, `MD5_${md5sum}`.
pub fn pseq_to_ac(seq: &str) -> Result<String, Error> {
    Ok(format!("MD5_{}", seq_md5(seq, true)?))
}

#[cfg(test)]
mod test {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn revcomp_cases() -> Result<(), Error> {
        assert_eq!(revcomp("")?, "");
        assert_eq!(revcomp("A")?, "T");
        assert_eq!(revcomp("AG")?, "CT");
        assert_eq!(revcomp("CGAG")?, "CTCG");
        assert_eq!(revcomp("acgN")?, "Ncgt");
        assert_eq!(revcomp("RYKMBVDH")?, "DHBVKMRY");

        Ok(())
    }

    #[test]
    fn revcomp_rejects_non_dna() {
        assert_eq!(
            revcomp("ACXT"),
            Err(Error::InvalidNucleotide("ACXT".to_string(), 'X', 2))
        );
        assert!(revcomp("ACGU").is_err());
        assert!(revcomp("A-C").is_err());
    }

    #[test]
    fn aa1_to_aa3_examples() -> Result<(), Error> {
        assert_eq!(aa1_to_aa3("")?, "");
        assert_eq!(
            aa1_to_aa3("CATSARELAME")?,
            "CysAlaThrSerAlaArgGluLeuAlaMetGlu"
        );
        assert_eq!(aa1_to_aa3("K*")?, "LysTer");
        assert!(aa1_to_aa3("KO").is_err());

        Ok(())
    }

    #[test]
    fn translate_cds_examples() -> Result<(), Error> {
        assert_eq!(translate_cds("ATGCGA", true, "*")?, "MR");
        assert_eq!(translate_cds("AUGCGA", true, "*")?, "MR");
        assert_eq!(translate_cds("atgcga", true, "*")?, "MR");
        assert_eq!(translate_cds("", true, "*")?, "");
        assert!(translate_cds("AUGCG", true, "*").is_err());
        assert_eq!(translate_cds("AUGCG", false, "*")?, "M*");
        assert_eq!(translate_cds("ATGTAN", true, "*")?, "MX");
        assert_eq!(translate_cds("CCN", true, "*")?, "P");
        assert_eq!(translate_cds("TRA", true, "*")?, "*");
        assert_eq!(translate_cds("TTNTA", false, "*")?, "X*");
        assert_eq!(translate_cds("CTB", true, "*")?, "L");
        assert_eq!(translate_cds("AGM", true, "*")?, "X");
        assert_eq!(translate_cds("GAS", true, "*")?, "X");
        assert_eq!(translate_cds("CUN", true, "*")?, "L");
        assert!(translate_cds("AUGCGQ", true, "*").is_err());

        Ok(())
    }

    #[test]
    fn standard_code_landmarks() -> Result<(), Error> {
        assert_eq!(translate_codon(b"TTT")?, b'F');
        assert_eq!(translate_codon(b"ATG")?, b'M');
        assert_eq!(translate_codon(b"TGG")?, b'W');
        assert_eq!(translate_codon(b"TAA")?, b'*');
        assert_eq!(translate_codon(b"TAG")?, b'*');
        assert_eq!(translate_codon(b"TGA")?, b'*');
        assert_eq!(translate_codon(b"GGG")?, b'G');
        assert_eq!(translate_codon(b"AAR")?, b'K');

        Ok(())
    }

    #[test]
    fn seq_md5_examples() -> Result<(), Error> {
        assert_eq!(seq_md5("", true)?, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(seq_md5("ACGT", true)?, "f1f8f4bf413b16ad135722aa4591043e");
        assert_eq!(seq_md5("ACGT*", true)?, "f1f8f4bf413b16ad135722aa4591043e");
        assert_eq!(
            seq_md5(" A C G T ", true)?,
            "f1f8f4bf413b16ad135722aa4591043e"
        );
        assert_eq!(seq_md5("acgt", true)?, "f1f8f4bf413b16ad135722aa4591043e");
        assert_eq!(seq_md5("acgt", false)?, "db516c3913e179338b162b2476d1c23f");

        Ok(())
    }

    #[test]
    fn pseq_to_ac_is_content_addressed() -> Result<(), Error> {
        assert_eq!(pseq_to_ac("ACGT")?, "MD5_f1f8f4bf413b16ad135722aa4591043e");
        assert_eq!(pseq_to_ac("MKAR*")?, pseq_to_ac("MKAR")?);

        Ok(())
    }

    #[test]
    fn normalize_sequence_examples() -> Result<(), Error> {
        assert_eq!(normalize_sequence("ACGT")?, "ACGT");
        assert_eq!(normalize_sequence("  A C G T * ")?, "ACGT");
        assert!(normalize_sequence("ACGT1").is_err());

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
