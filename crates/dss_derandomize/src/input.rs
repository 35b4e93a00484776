// Copyright contributors to the Derandomized Shallow Shadows project
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

//! Plain-text observable and weight files.
//!
//! Both formats hold one entry per line. Blank lines are skipped and surrounding whitespace
//! is ignored, so files written by hand or by other tools load unchanged.

use std::{
    io::{self, BufRead},
    num::ParseFloatError,
};

use dss_common::{ParsePauliError, PauliString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("line {line}: invalid Pauli string")]
    Pauli {
        line: usize,
        #[source]
        source: ParsePauliError,
    },
    #[error("line {line}: invalid weight {text:?}")]
    Weight {
        line: usize,
        text: String,
        #[source]
        source: ParseFloatError,
    },
}

/// Non-blank lines with their 1-based line number.
fn entries<R: BufRead>(reader: R) -> impl Iterator<Item = Result<(usize, String), io::Error>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(Ok((i + 1, line))),
            Err(e) => Some(Err(e)),
        })
}

/// Read one Pauli string per line, such as `XIZY`. Labels are case-insensitive.
pub fn load_pauli_strings<R: BufRead>(reader: R) -> Result<Vec<PauliString>, InputError> {
    entries(reader)
        .map(|entry| {
            let (line, text) = entry?;
            text.parse()
                .map_err(|source| InputError::Pauli { line, source })
        })
        .collect()
}

/// Read one floating-point weight per line.
pub fn load_weights<R: BufRead>(reader: R) -> Result<Vec<f64>, InputError> {
    entries(reader)
        .map(|entry| {
            let (line, text) = entry?;
            let trimmed = text.trim();
            trimmed.parse().map_err(|source| InputError::Weight {
                line,
                text: trimmed.to_string(),
                source,
            })
        })
        .collect()
}
