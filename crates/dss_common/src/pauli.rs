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

use std::fmt::Display;

use rand::distr::{Distribution, StandardUniform};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single-qubit Pauli label.
///
/// The declaration order doubles as the index into local tensors:
/// I=0, X=1, Y=2, Z=3.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Pauli {
    #[default]
    I,
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot convert {0:?} to a Pauli")]
pub struct ParsePauliError(pub char);

impl Pauli {
    pub const ALL: [Pauli; 4] = [Pauli::I, Pauli::X, Pauli::Y, Pauli::Z];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether a computational-basis readout learns this label (I or Z).
    pub fn is_diagonal(self) -> bool {
        matches!(self, Pauli::I | Pauli::Z)
    }

    /// The (x, z) bits of the symplectic representation.
    pub fn symplectic(self) -> (bool, bool) {
        match self {
            Pauli::I => (false, false),
            Pauli::X => (true, false),
            Pauli::Y => (true, true),
            Pauli::Z => (false, true),
        }
    }

    pub fn from_symplectic(x: bool, z: bool) -> Self {
        match (x, z) {
            (false, false) => Pauli::I,
            (true, false) => Pauli::X,
            (true, true) => Pauli::Y,
            (false, true) => Pauli::Z,
        }
    }
}

impl Display for Pauli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Distribution<Pauli> for StandardUniform {
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Pauli {
        let i = rng.random_range(0..=3);
        match i {
            0 => Pauli::I,
            1 => Pauli::X,
            2 => Pauli::Y,
            3 => Pauli::Z,
            _ => unreachable!("RNG number out of range"),
        }
    }
}

impl TryFrom<char> for Pauli {
    type Error = ParsePauliError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase() {
            'i' => Ok(Pauli::I),
            'x' => Ok(Pauli::X),
            'y' => Ok(Pauli::Y),
            'z' => Ok(Pauli::Z),
            _ => Err(ParsePauliError(value)),
        }
    }
}
