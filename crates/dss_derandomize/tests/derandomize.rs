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

//! End-to-end properties of the derandomization engine.

use std::{collections::HashSet, sync::LazyLock};

use dss_benchmark::random::distinct_observables;
use dss_common::{MeasurementCircuit, PauliString};
use dss_derandomize::{
    derandomize, load_pauli_strings, ConfigError, DerandomizationOutcome, DerandomizeError,
    Derandomizer, DssConfig, Termination,
};
use itertools::iproduct;

// ---------------------------------------------------------------------------
// Shared fixtures
// ---------------------------------------------------------------------------

static THIRTY_STRINGS: LazyLock<DssConfig> = LazyLock::new(|| {
    let observables = distinct_observables(8, 30, 2024).expect("8 qubits hold 30 strings");
    DssConfig::new(8, 3, 0.9, 100, 100, observables, None).expect("Configuration should be valid")
});

static THIRTY_STRINGS_OUTCOME: LazyLock<DerandomizationOutcome> =
    LazyLock::new(|| derandomize(&THIRTY_STRINGS).expect("Run should succeed"));

fn strings(labels: &[&str]) -> Vec<PauliString> {
    labels.iter().map(|l| l.parse().unwrap()).collect()
}

/// Structural checks every outcome of a valid configuration must pass.
fn check_outcome(config: &DssConfig, outcome: &DerandomizationOutcome) {
    assert!(outcome.rounds.len() <= config.total_measurements());
    assert!(!outcome.rounds.is_empty());
    assert_eq!(config.observables().len(), outcome.remaining_measurements.len());
    for (i, record) in outcome.rounds.iter().enumerate() {
        assert_eq!(i, record.round);
        let circuit: &MeasurementCircuit = &record.circuit;
        assert_eq!(config.depth(), circuit.depth());
        assert_eq!(config.qubits(), circuit.qubits());
        assert!(circuit.is_fully_specified());
        assert!(circuit.layers().iter().all(|l| l.is_valid(config.qubits())));
        let unique: HashSet<_> = record.hits.iter().collect();
        assert_eq!(record.hits.len(), unique.len());
    }
    let credited: usize = outcome
        .remaining_measurements
        .iter()
        .map(|r| {
            assert!(*r <= config.measurements_per_observable());
            config.measurements_per_observable() - r
        })
        .sum();
    assert_eq!(outcome.total_hits(), credited);
    match outcome.termination {
        Termination::AllObservablesLearned => {
            assert!(outcome.remaining_measurements.iter().all(|r| *r == 0))
        }
        Termination::BudgetExhausted => {
            assert_eq!(config.total_measurements(), outcome.rounds.len())
        }
        Termination::Interrupted => panic!("run() never interrupts"),
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn commuting_strings_share_one_rotation() {
    let config = DssConfig::new(2, 1, 0.9, 3, 1, strings(&["XX", "XI", "IX"]), None).unwrap();
    let outcome = derandomize(&config).unwrap();
    check_outcome(&config, &outcome);
    assert_eq!(Termination::AllObservablesLearned, outcome.termination);
    assert_eq!(vec![0, 0, 0], outcome.remaining_measurements);
    assert_eq!(1, outcome.rounds.len());
    assert_eq!(vec![0, 1, 2], outcome.rounds[0].hits);
}

#[test]
fn thirty_strings_terminate_within_budget() {
    let outcome = &*THIRTY_STRINGS_OUTCOME;
    check_outcome(&THIRTY_STRINGS, outcome);
    assert!(outcome.rounds.len() <= 100);
    assert!(outcome.total_hits() > 0);
}

#[test]
fn thirty_strings_hits_match_counters() {
    let outcome = &*THIRTY_STRINGS_OUTCOME;
    let mut per_observable = vec![0; THIRTY_STRINGS.observables().len()];
    for record in &outcome.rounds {
        for i in &record.hits {
            per_observable[*i] += 1;
        }
    }
    for (hits, remaining) in per_observable.iter().zip(&outcome.remaining_measurements) {
        assert_eq!(100, hits + remaining);
    }
}

#[test]
fn small_configurations_respect_budgets() {
    for (qubits, depth, total, target) in iproduct!([1, 2, 3, 5], [0, 1, 2], [1, 4], [1, 3]) {
        let count = 3usize.min(4usize.pow(qubits as u32) - 1);
        let observables = distinct_observables(qubits, count, 11).unwrap();
        let config = DssConfig::new(qubits, depth, 0.9, total, target, observables, None).unwrap();
        let outcome = derandomize(&config).unwrap();
        check_outcome(&config, &outcome);
    }
}

#[test]
fn weights_are_carried_through() {
    let config = DssConfig::new(
        3,
        2,
        0.5,
        6,
        2,
        strings(&["XYZ", "ZZI", "IXX"]),
        Some(vec![0.2, 1.0, 3.0]),
    )
    .unwrap();
    let outcome = derandomize(&config).unwrap();
    check_outcome(&config, &outcome);
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn parallel_and_sequential_runs_agree() {
    let observables = distinct_observables(6, 12, 5).unwrap();
    let config = DssConfig::new(6, 2, 0.9, 20, 4, observables, None).unwrap();
    let parallel = Derandomizer::new(&config).unwrap().run().unwrap();
    let sequential = Derandomizer::new(&config)
        .unwrap()
        .with_parallelism(false)
        .run()
        .unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn repeated_runs_are_identical() {
    let observables = distinct_observables(5, 10, 9).unwrap();
    let config = DssConfig::new(5, 3, 1.3, 15, 3, observables, None).unwrap();
    let first = derandomize(&config).unwrap();
    let second = derandomize(&config).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn cost_is_stable_under_reevaluation() {
    let observables = distinct_observables(4, 6, 3).unwrap();
    let config = DssConfig::new(4, 2, 0.9, 10, 2, observables, None).unwrap();
    let engine = Derandomizer::new(&config).unwrap();
    let circuit = MeasurementCircuit::randomized(4, 2);
    let first = engine
        .evaluator()
        .evaluate_circuit(engine.registry(), &circuit, 0)
        .unwrap();
    let second = engine
        .evaluator()
        .evaluate_circuit(engine.registry(), &circuit, 0)
        .unwrap();
    assert!((first - second).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Monotonicity and boundaries
// ---------------------------------------------------------------------------

#[test]
fn coverage_grows_with_measurement_target() {
    let mut previous = 0;
    for target in 1..=6 {
        let config = DssConfig::new(4, 2, 0.9, 8, target, strings(&["XYZI"]), None).unwrap();
        let outcome = derandomize(&config).unwrap();
        let hits = outcome.rounds.iter().filter(|r| r.hits.contains(&0)).count();
        assert!(hits >= previous, "target {target}: {hits} < {previous}");
        previous = hits;
    }
}

#[test]
fn single_qubit_uses_only_single_qubit_gates() {
    let config = DssConfig::new(1, 2, 0.9, 5, 1, strings(&["X", "Y", "Z"]), None).unwrap();
    let outcome = derandomize(&config).unwrap();
    check_outcome(&config, &outcome);
    assert_eq!(Termination::AllObservablesLearned, outcome.termination);
    assert_eq!(3, outcome.rounds.len());
    for circuit in outcome.circuits() {
        assert!(circuit.layers().iter().all(|l| l.couplings.is_empty()));
        assert_eq!(0, circuit.entangling_gates());
    }
}

#[test]
fn depth_zero_only_rotates() {
    let config = DssConfig::new(3, 0, 0.9, 4, 1, strings(&["XZI", "IYY", "ZZZ"]), None).unwrap();
    let outcome = derandomize(&config).unwrap();
    check_outcome(&config, &outcome);
    assert!(outcome.circuits().all(|c| c.layers().is_empty() && c.stages() == 1));
}

#[test]
fn budget_of_one_circuit() {
    let config = DssConfig::new(2, 1, 0.9, 1, 1, strings(&["XY", "YX", "ZZ"]), None).unwrap();
    let outcome = derandomize(&config).unwrap();
    check_outcome(&config, &outcome);
    assert_eq!(1, outcome.rounds.len());
}

// ---------------------------------------------------------------------------
// Rejected input
// ---------------------------------------------------------------------------

#[test]
fn loaded_strings_must_match_qubits() {
    let observables = load_pauli_strings("XXI\nZZ\n".as_bytes()).unwrap();
    let err = DssConfig::new(3, 1, 0.9, 3, 1, observables, None).unwrap_err();
    assert!(matches!(err, ConfigError::WrongLength { index: 1, .. }));
    let err: DerandomizeError = err.into();
    assert!(err.to_string().contains("observable 1"));
}
