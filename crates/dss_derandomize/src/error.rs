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

use dss_common::{PauliString, Slot};
use dss_tensor::ContractionError;
use thiserror::Error;

/// Rejected run parameters. Detected before any search starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("the number of qubits must be positive")]
    NoQubits,
    #[error("eta must be finite and positive, got {0}")]
    InvalidEta(f64),
    #[error("total_measurements must be positive")]
    NoMeasurementBudget,
    #[error("measurements_per_observable must be positive")]
    NoObservableBudget,
    #[error("there are no observables to learn")]
    NoObservables,
    #[error("observable {index} ({observable}) acts on {len} qubits instead of {qubits}")]
    WrongLength {
        index: usize,
        observable: PauliString,
        len: usize,
        qubits: usize,
    },
    #[error("{weights} weights given for {observables} observables")]
    WeightCountMismatch { weights: usize, observables: usize },
    #[error("weight {index} is {value}, weights must be finite and non-negative")]
    InvalidWeight { index: usize, value: f64 },
}

#[derive(Debug, Error)]
pub enum DerandomizeError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error(
        "numerical instability in round {round}{} for observable {observable}",
        at_slot(.slot)
    )]
    NumericalInstability {
        round: usize,
        /// The slot being decided, or `None` outside of candidate scoring.
        slot: Option<Slot>,
        observable: usize,
        #[source]
        source: ContractionError,
    },
}

fn at_slot(slot: &Option<Slot>) -> String {
    slot.map(|s| format!(" at {s}")).unwrap_or_default()
}
