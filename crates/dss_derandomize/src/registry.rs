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
use serde::Serialize;

use crate::config::DssConfig;

/// Bookkeeping for one target observable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservableState {
    observable: PauliString,
    weight: f64,
    remaining: usize,
}

impl ObservableState {
    pub fn observable(&self) -> &PauliString {
        &self.observable
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn remaining_measurements(&self) -> usize {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }
}

/// Per-observable counters, keyed by the observable's index in the configuration.
///
/// Counters only change through [`ObservableRegistry::record_hit`], which the engine calls
/// once per finalized circuit.
#[derive(Debug, Clone)]
pub struct ObservableRegistry {
    states: Vec<ObservableState>,
    target: usize,
}

impl ObservableRegistry {
    pub fn new(config: &DssConfig) -> Self {
        let target = config.measurements_per_observable();
        let states = config
            .observables()
            .iter()
            .zip(config.weights())
            .map(|(observable, weight)| ObservableState {
                observable: observable.clone(),
                weight: *weight,
                remaining: target,
            })
            .collect();
        Self { states, target }
    }

    pub fn states(&self) -> &[ObservableState] {
        &self.states
    }

    /// Indices of observables that still need measurements, in increasing order.
    pub fn active(&self) -> impl Iterator<Item = usize> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_active())
            .map(|(i, _)| i)
    }

    pub fn active_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_active()).count()
    }

    pub fn all_learned(&self) -> bool {
        self.states.iter().all(|s| !s.is_active())
    }

    /// Measurements credited so far to observable `index`.
    pub fn hits(&self, index: usize) -> usize {
        self.target - self.states[index].remaining
    }

    pub fn remaining_measurements(&self) -> Vec<usize> {
        self.states.iter().map(|s| s.remaining).collect()
    }

    /// Credit one measurement to observable `index`. Inactive observables are left at zero
    /// and not credited.
    pub(crate) fn record_hit(&mut self, index: usize) -> bool {
        let state = &mut self.states[index];
        if state.remaining == 0 {
            return false;
        }
        state.remaining -= 1;
        true
    }
}
