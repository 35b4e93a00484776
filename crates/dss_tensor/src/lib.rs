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

//! Layer contraction for shallow brickwork measurement circuits.
//!
//! An observable is carried through a circuit as one probability vector over {I, X, Y, Z}
//! per qubit. Single-qubit gates act on one site. Two-qubit gates merge two sites into a
//! joint distribution, transfer it, and marginalize back, so only local information is
//! kept between gates.

mod contract;
mod local;
mod propagated;
mod transfer;

pub use contract::{
    contract_from, contract_layer, contract_rotation, contract_stage, success_probability,
    ContractionError,
};
pub use local::{JointTensor, LocalTensor, TensorError, TOLERANCE};
pub use propagated::PropagatedTensor;
pub use transfer::{pair_transfer_matrix, single_transfer_matrix};
