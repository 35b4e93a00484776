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

//! Scalar cost of a partially decided measurement circuit.
//!
//! For every active observable `l` the cost adds
//!
//! ```text
//! w_l * exp(-eta/2 * h_l) * (1 - nu * p_l) * (1 - nu * b_l)^F
//! ```
//!
//! with `nu = 1 - exp(-eta/2)`, `h_l` the measurements already credited to `l`, `p_l` the
//! success proxy of the circuit under construction (undecided slots still random), `b_l` the
//! success proxy of a fully random circuit and `F` the number of rounds left after this one.
//! Past hits, the current circuit and the future random circuits thus each contribute one
//! factor to an upper bound on the probability of not learning `l` often enough.

use dss_common::MeasurementCircuit;
use dss_tensor::{contract_from, success_probability, ContractionError, PropagatedTensor};
use log::trace;

use crate::{config::DssConfig, registry::ObservableRegistry};

/// A finalized circuit hits an observable when its success proxy reaches this value.
pub const HIT_THRESHOLD: f64 = 0.5;

/// Contraction failure while scoring, tagged with the observable being contracted.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ObservableFault {
    pub observable: usize,
    pub source: ContractionError,
}

#[derive(Debug, Clone)]
pub struct CostEvaluator {
    half_eta: f64,
    nu: f64,
    total_measurements: usize,
    baseline: Vec<f64>,
}

impl CostEvaluator {
    /// Precompute the fully random success proxy of every observable.
    pub(crate) fn new(config: &DssConfig) -> Result<Self, ObservableFault> {
        let random = MeasurementCircuit::randomized(config.qubits(), config.depth());
        let baseline = config
            .observables()
            .iter()
            .enumerate()
            .map(|(observable, o)| {
                success_probability(o, &random)
                    .map_err(|source| ObservableFault { observable, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let half_eta = config.eta() / 2.0;
        Ok(Self {
            half_eta,
            nu: 1.0 - (-half_eta).exp(),
            total_measurements: config.total_measurements(),
            baseline,
        })
    }

    /// Success proxy of observable `index` under a fully random circuit.
    pub fn baseline(&self, index: usize) -> f64 {
        self.baseline[index]
    }

    /// Contribution of observable `index` with success proxy `probability` in round `round`.
    pub fn term(
        &self,
        registry: &ObservableRegistry,
        index: usize,
        probability: f64,
        round: usize,
    ) -> f64 {
        let state = &registry.states()[index];
        let future = self.total_measurements.saturating_sub(round + 1);
        let past = (-self.half_eta * registry.hits(index) as f64).exp();
        let current = 1.0 - self.nu * probability;
        let random = (1.0 - self.nu * self.baseline[index]).powf(future as f64);
        state.weight() * past * current * random
    }

    /// Sum of [`CostEvaluator::term`] over `(index, proxy)` pairs, skipping inactive
    /// observables. Zero when nothing is active.
    pub fn cost(
        &self,
        registry: &ObservableRegistry,
        probabilities: impl IntoIterator<Item = (usize, f64)>,
        round: usize,
    ) -> f64 {
        probabilities
            .into_iter()
            .filter(|(index, _)| registry.states()[*index].is_active())
            .map(|(index, p)| self.term(registry, index, p, round))
            .sum()
    }

    /// Cost of `circuit` for observables whose tensors are already contracted through every
    /// stage before `stage`.
    pub(crate) fn evaluate(
        &self,
        registry: &ObservableRegistry,
        snapshots: &[(usize, PropagatedTensor)],
        circuit: &MeasurementCircuit,
        stage: usize,
        round: usize,
    ) -> Result<f64, ObservableFault> {
        let mut probabilities = Vec::with_capacity(snapshots.len());
        for (observable, snapshot) in snapshots {
            let mut tensor = snapshot.clone();
            contract_from(&mut tensor, circuit, stage).map_err(|source| ObservableFault {
                observable: *observable,
                source,
            })?;
            probabilities.push((*observable, tensor.success_probability()));
        }
        let cost = self.cost(registry, probabilities, round);
        trace!("Cost {cost} in round {round} from stage {stage}");
        Ok(cost)
    }

    /// Cost of a fully contracted circuit, for callers holding only observables.
    pub fn evaluate_circuit(
        &self,
        registry: &ObservableRegistry,
        circuit: &MeasurementCircuit,
        round: usize,
    ) -> Result<f64, ContractionError> {
        let probabilities = registry
            .active()
            .map(|index| {
                success_probability(registry.states()[index].observable(), circuit)
                    .map(|p| (index, p))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.cost(registry, probabilities, round))
    }
}

#[cfg(test)]
mod tests {
    use dss_common::{GateChoice, PauliString, SingleQubitGate, Slot};

    use super::*;

    fn config(labels: &[&str], total: usize, target: usize) -> DssConfig {
        let observables: Vec<PauliString> = labels.iter().map(|l| l.parse().unwrap()).collect();
        DssConfig::new(observables[0].len(), 1, 0.9, total, target, observables, None).unwrap()
    }

    #[test]
    fn baseline_is_random_circuit_proxy() {
        let config = config(&["ZI", "XX"], 3, 1);
        let evaluator = CostEvaluator::new(&config).unwrap();
        assert!((0.0..=1.0).contains(&evaluator.baseline(0)));
        assert!(evaluator.baseline(1) > 0.0 && evaluator.baseline(1) < 1.0);
    }

    #[test]
    fn single_term_matches_formula() {
        let config = config(&["XX"], 5, 2);
        let evaluator = CostEvaluator::new(&config).unwrap();
        let registry = ObservableRegistry::new(&config);
        let nu = 1.0 - (-0.45f64).exp();
        let b = evaluator.baseline(0);
        let expected = (1.0 - nu * 0.25) * (1.0 - nu * b).powi(3);
        let got = evaluator.cost(&registry, [(0, 0.25)], 1);
        assert!((expected - got).abs() < 1e-12);
    }

    #[test]
    fn huge_budgets_shrink_the_future_factor() {
        let short = config(&["XY", "ZZ"], 4, 1);
        let short_evaluator = CostEvaluator::new(&short).unwrap();
        let short_term = short_evaluator.term(&ObservableRegistry::new(&short), 0, 0.0, 0);
        assert!(short_term > 0.5 && short_term < 1.0);

        for total in [i32::MAX as usize + 5, usize::MAX] {
            let long = config(&["XY", "ZZ"], total, 1);
            let evaluator = CostEvaluator::new(&long).unwrap();
            let term = evaluator.term(&ObservableRegistry::new(&long), 0, 0.0, 0);
            assert!((0.0..1e-6).contains(&term), "{total}: {term}");
        }
    }

    #[test]
    fn past_hits_discount_the_term() {
        let config = config(&["XX"], 5, 2);
        let evaluator = CostEvaluator::new(&config).unwrap();
        let mut registry = ObservableRegistry::new(&config);
        let before = evaluator.cost(&registry, [(0, 0.0)], 0);
        registry.record_hit(0);
        let after = evaluator.cost(&registry, [(0, 0.0)], 0);
        assert!((after / before - (-0.45f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn inactive_observables_cost_nothing() {
        let config = config(&["XX"], 5, 1);
        let evaluator = CostEvaluator::new(&config).unwrap();
        let mut registry = ObservableRegistry::new(&config);
        registry.record_hit(0);
        assert_eq!(0.0, evaluator.cost(&registry, [(0, 0.3)], 1));
        let circuit = MeasurementCircuit::randomized(2, 1);
        assert_eq!(0.0, evaluator.evaluate_circuit(&registry, &circuit, 1).unwrap());
    }

    #[test]
    fn higher_success_lowers_cost() {
        let config = config(&["XZ"], 4, 1);
        let evaluator = CostEvaluator::new(&config).unwrap();
        let registry = ObservableRegistry::new(&config);
        let random = MeasurementCircuit::randomized(2, 1);
        let mut rotated = random.clone();
        rotated.assign(
            Slot::BasisRotation { qubit: 0 },
            GateChoice::Single(SingleQubitGate::Hadamard),
        );
        let random_cost = evaluator.evaluate_circuit(&registry, &random, 0).unwrap();
        let rotated_cost = evaluator.evaluate_circuit(&registry, &rotated, 0).unwrap();
        assert!(rotated_cost < random_cost);
    }

    #[test]
    fn evaluation_is_repeatable() {
        let config = config(&["XYZI", "IZZX", "YYII"], 10, 3);
        let evaluator = CostEvaluator::new(&config).unwrap();
        let registry = ObservableRegistry::new(&config);
        let circuit = MeasurementCircuit::randomized(4, 1);
        let snapshots: Vec<_> = registry
            .active()
            .map(|i| (i, PropagatedTensor::for_observable(&config.observables()[i])))
            .collect();
        let first = evaluator.evaluate(&registry, &snapshots, &circuit, 0, 2).unwrap();
        let second = evaluator.evaluate(&registry, &snapshots, &circuit, 0, 2).unwrap();
        assert_eq!(first, second);
        let direct = evaluator.evaluate_circuit(&registry, &circuit, 2).unwrap();
        assert!((first - direct).abs() < 1e-12);
    }
}
