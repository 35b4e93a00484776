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

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::pauli::{ParsePauliError, Pauli};

/// A target observable on N qubits, stored as one label per qubit with qubit 0 first.
///
/// Equality, ordering and hashing follow the label sequence.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PauliString(Vec<Pauli>);

impl PauliString {
    pub fn new(paulis: Vec<Pauli>) -> Self {
        Self(paulis)
    }

    pub fn identity(qubits: usize) -> Self {
        Self(vec![Pauli::I; qubits])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pauli> {
        self.0.iter()
    }

    /// Number of non-identity sites
    pub fn weight(&self) -> usize {
        self.0.iter().filter(|p| **p != Pauli::I).count()
    }

    pub fn is_identity(&self) -> bool {
        self.weight() == 0
    }
}

impl FromStr for PauliString {
    type Err = ParsePauliError;

    /// Parse labels such as `"XIZY"`, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .chars()
            .map(Pauli::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl TryFrom<String> for PauliString {
    type Error = ParsePauliError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PauliString> for String {
    fn from(value: PauliString) -> Self {
        value.to_string()
    }
}

impl fmt::Debug for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PauliString({})", self)
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for pauli in &self.0 {
            write!(f, "{}", pauli)?;
        }
        Ok(())
    }
}
