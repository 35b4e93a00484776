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

pub mod circuit;
pub mod gates;
mod pauli;
mod pauli_string;

pub use circuit::{brickwork_pairs, CircuitLayer, Coupling, MeasurementCircuit, Slot};
pub use gates::{GateChoice, SingleQubitGate, TwoQubitGate};
pub use pauli::{ParsePauliError, Pauli};
pub use pauli_string::PauliString;
