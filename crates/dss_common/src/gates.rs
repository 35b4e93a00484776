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

//! The catalog of elementary gates usable in the shallow-circuit ansatz.
//!
//! Gates are described by their action on Pauli labels under conjugation, ignoring signs.
//! Every deterministic gate permutes labels and fixes the identity. The `Twirl` variants stand
//! for a uniformly random Clifford on the same support: they are the gates of the randomized
//! protocol and serve as placeholders for undecided slots, but never appear as candidates.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::pauli::Pauli;

/// Single-qubit Clifford classes modulo Paulis, named by how they permute X, Y and Z.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SingleQubitGate {
    Identity,
    /// Y <-> Z
    SqrtX,
    /// X <-> Y
    Phase,
    /// X -> Z -> Y -> X
    CycleXZY,
    /// X -> Y -> Z -> X
    CycleXYZ,
    /// X <-> Z
    Hadamard,
    Twirl,
}

impl SingleQubitGate {
    /// Candidates in catalog order. Ties between equal costs go to the earlier entry.
    pub const CANDIDATES: [SingleQubitGate; 6] = [
        SingleQubitGate::Identity,
        SingleQubitGate::SqrtX,
        SingleQubitGate::Phase,
        SingleQubitGate::CycleXZY,
        SingleQubitGate::CycleXYZ,
        SingleQubitGate::Hadamard,
    ];

    pub fn is_placeholder(self) -> bool {
        self == SingleQubitGate::Twirl
    }

    /// The label `p` is mapped to, or `None` for the random placeholder.
    pub fn image(self, p: Pauli) -> Option<Pauli> {
        use Pauli::{I, X, Y, Z};
        let (x, y, z) = match self {
            Self::Identity => (X, Y, Z),
            Self::SqrtX => (X, Z, Y),
            Self::Phase => (Y, X, Z),
            Self::CycleXZY => (Z, X, Y),
            Self::CycleXYZ => (Y, Z, X),
            Self::Hadamard => (Z, Y, X),
            Self::Twirl => return None,
        };
        Some(match p {
            I => I,
            X => x,
            Y => y,
            Z => z,
        })
    }
}

/// Two-qubit gates acting on an ordered pair `(a, b)` of qubits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TwoQubitGate {
    Identity,
    /// Controlled-NOT with the first qubit of the pair as control
    Cnot,
    Swap,
    Twirl,
}

impl TwoQubitGate {
    /// Candidates in catalog order. Ties between equal costs go to the earlier entry.
    pub const CANDIDATES: [TwoQubitGate; 3] = [
        TwoQubitGate::Identity,
        TwoQubitGate::Cnot,
        TwoQubitGate::Swap,
    ];

    pub fn is_placeholder(self) -> bool {
        self == TwoQubitGate::Twirl
    }

    /// The pair of labels `(a, b)` is mapped to, or `None` for the random placeholder.
    pub fn image(self, a: Pauli, b: Pauli) -> Option<(Pauli, Pauli)> {
        match self {
            Self::Identity => Some((a, b)),
            Self::Swap => Some((b, a)),
            Self::Cnot => {
                // X spreads from control to target, Z from target to control.
                let (xa, za) = a.symplectic();
                let (xb, zb) = b.symplectic();
                Some((
                    Pauli::from_symplectic(xa, za ^ zb),
                    Pauli::from_symplectic(xb ^ xa, zb),
                ))
            }
            Self::Twirl => None,
        }
    }
}

/// One catalog entry chosen for a slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateChoice {
    Single(SingleQubitGate),
    Two(TwoQubitGate),
}

impl GateChoice {
    pub fn is_placeholder(self) -> bool {
        match self {
            GateChoice::Single(g) => g.is_placeholder(),
            GateChoice::Two(g) => g.is_placeholder(),
        }
    }
}

impl Display for SingleQubitGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Identity => "I",
            Self::SqrtX => "SX",
            Self::Phase => "S",
            Self::CycleXZY => "C+",
            Self::CycleXYZ => "C-",
            Self::Hadamard => "H",
            Self::Twirl => "?",
        };
        write!(f, "{name}")
    }
}

impl Display for TwoQubitGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Identity => "II",
            Self::Cnot => "CX",
            Self::Swap => "SWAP",
            Self::Twirl => "??",
        };
        write!(f, "{name}")
    }
}

impl Display for GateChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateChoice::Single(g) => write!(f, "{g}"),
            GateChoice::Two(g) => write!(f, "{g}"),
        }
    }
}
