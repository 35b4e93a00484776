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

use dss_common::PauliString;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Immutable parameters of one derandomization run.
///
/// Always valid once constructed: both [`DssConfig::new`] and deserialization go through
/// [`DssConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct DssConfig {
    qubits: usize,
    depth: usize,
    eta: f64,
    total_measurements: usize,
    measurements_per_observable: usize,
    observables: Vec<PauliString>,
    weights: Vec<f64>,
}

#[derive(Deserialize)]
struct RawConfig {
    qubits: usize,
    depth: usize,
    eta: f64,
    total_measurements: usize,
    measurements_per_observable: usize,
    observables: Vec<PauliString>,
    weights: Option<Vec<f64>>,
}

impl TryFrom<RawConfig> for DssConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        DssConfig::new(
            raw.qubits,
            raw.depth,
            raw.eta,
            raw.total_measurements,
            raw.measurements_per_observable,
            raw.observables,
            raw.weights,
        )
    }
}

impl DssConfig {
    /// Missing weights default to 1.0 for every observable.
    pub fn new(
        qubits: usize,
        depth: usize,
        eta: f64,
        total_measurements: usize,
        measurements_per_observable: usize,
        observables: Vec<PauliString>,
        weights: Option<Vec<f64>>,
    ) -> Result<Self, ConfigError> {
        let weights = weights.unwrap_or_else(|| vec![1.0; observables.len()]);
        let config = Self {
            qubits,
            depth,
            eta,
            total_measurements,
            measurements_per_observable,
            observables,
            weights,
        };
        config.validate()?;
        if config.qubits == 1 && config.depth > 0 {
            warn!(
                "A single qubit has no couplings: the {} layers only carry single-qubit gates",
                config.depth
            );
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.qubits == 0 {
            return Err(ConfigError::NoQubits);
        }
        if !self.eta.is_finite() || self.eta <= 0.0 {
            return Err(ConfigError::InvalidEta(self.eta));
        }
        if self.total_measurements == 0 {
            return Err(ConfigError::NoMeasurementBudget);
        }
        if self.measurements_per_observable == 0 {
            return Err(ConfigError::NoObservableBudget);
        }
        if self.observables.is_empty() {
            return Err(ConfigError::NoObservables);
        }
        if let Some((index, observable)) = self
            .observables
            .iter()
            .enumerate()
            .find(|(_, o)| o.len() != self.qubits)
        {
            return Err(ConfigError::WrongLength {
                index,
                observable: observable.clone(),
                len: observable.len(),
                qubits: self.qubits,
            });
        }
        if self.weights.len() != self.observables.len() {
            return Err(ConfigError::WeightCountMismatch {
                weights: self.weights.len(),
                observables: self.observables.len(),
            });
        }
        if let Some((index, value)) = self
            .weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(ConfigError::InvalidWeight {
                index,
                value: *value,
            });
        }
        Ok(())
    }

    pub fn qubits(&self) -> usize {
        self.qubits
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    pub fn total_measurements(&self) -> usize {
        self.total_measurements
    }

    pub fn measurements_per_observable(&self) -> usize {
        self.measurements_per_observable
    }

    pub fn observables(&self) -> &[PauliString] {
        &self.observables
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}
