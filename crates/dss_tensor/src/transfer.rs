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

//! Transfer of Pauli weight through catalog gates.
//!
//! Deterministic gates are label permutations and are applied as such. The dense
//! column-stochastic matrices are the reference form of the same maps.

use dss_common::{Pauli, SingleQubitGate, TwoQubitGate};
use nalgebra::{Matrix4, SMatrix};

pub(crate) enum SingleTransfer {
    /// `images[from] = to`
    Permute([usize; 4]),
    Twirl,
}

impl From<SingleQubitGate> for SingleTransfer {
    fn from(gate: SingleQubitGate) -> Self {
        let mut images = [0; 4];
        for p in Pauli::ALL {
            match gate.image(p) {
                Some(q) => images[p.index()] = q.index(),
                None => return SingleTransfer::Twirl,
            }
        }
        SingleTransfer::Permute(images)
    }
}

pub(crate) enum PairTransfer {
    /// `images[4 * a + b] = 4 * c + d`
    Permute([usize; 16]),
    Twirl,
}

impl From<TwoQubitGate> for PairTransfer {
    fn from(gate: TwoQubitGate) -> Self {
        let mut images = [0; 16];
        for a in Pauli::ALL {
            for b in Pauli::ALL {
                match gate.image(a, b) {
                    Some((c, d)) => images[4 * a.index() + b.index()] = 4 * c.index() + d.index(),
                    None => return PairTransfer::Twirl,
                }
            }
        }
        PairTransfer::Permute(images)
    }
}

/// Column-stochastic matrix `T` with `T[(to, from)]` the probability of `from -> to`.
pub fn single_transfer_matrix(gate: SingleQubitGate) -> Matrix4<f64> {
    match SingleTransfer::from(gate) {
        SingleTransfer::Permute(images) => {
            Matrix4::from_fn(|to, from| if images[from] == to { 1.0 } else { 0.0 })
        }
        SingleTransfer::Twirl => Matrix4::from_fn(|to, from| match (to, from) {
            (0, 0) => 1.0,
            (0, _) | (_, 0) => 0.0,
            _ => 1.0 / 3.0,
        }),
    }
}

/// Two-qubit analogue of [`single_transfer_matrix`] on labels `4 * a + b`.
pub fn pair_transfer_matrix(gate: TwoQubitGate) -> SMatrix<f64, 16, 16> {
    match PairTransfer::from(gate) {
        PairTransfer::Permute(images) => {
            SMatrix::from_fn(|to, from| if images[from] == to { 1.0 } else { 0.0 })
        }
        PairTransfer::Twirl => SMatrix::from_fn(|to, from| match (to, from) {
            (0, 0) => 1.0,
            (0, _) | (_, 0) => 0.0,
            _ => 1.0 / 15.0,
        }),
    }
}
