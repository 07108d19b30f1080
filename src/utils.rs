//! Small helpers shared by the consequence prediction code.

/// Remove the longest common prefix of `reference` and `alternative`.
///
/// Returns the number of trimmed characters and the two remainders.  Works on ASCII
/// sequences (nucleotides, 1-letter amino acids).
pub(crate) fn trim_common_prefixes<'a>(
    reference: &'a str,
    alternative: &'a str,
) -> (usize, &'a str, &'a str) {
    let trim = reference
        .bytes()
        .zip(alternative.bytes())
        .take_while(|(r, a)| r == a)
        .count();
    (trim, &reference[trim..], &alternative[trim..])
}

/// Remove the longest common suffix of `reference` and `alternative`.
///
/// Returns the number of trimmed characters and the two remainders.
pub(crate) fn trim_common_suffixes<'a>(
    reference: &'a str,
    alternative: &'a str,
) -> (usize, &'a str, &'a str) {
    let trim = reference
        .bytes()
        .rev()
        .zip(alternative.bytes().rev())
        .take_while(|(r, a)| r == a)
        .count();
    (
        trim,
        &reference[..reference.len() - trim],
        &alternative[..alternative.len() - trim],
    )
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
