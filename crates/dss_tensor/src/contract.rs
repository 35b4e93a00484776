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

use dss_common::{CircuitLayer, MeasurementCircuit, PauliString, SingleQubitGate};
use thiserror::Error;

use crate::{
    local::TensorError,
    propagated::{PropagatedTensor, SiteError},
};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid tensor on qubit {qubit} at stage {stage}")]
pub struct ContractionError {
    pub stage: usize,
    pub qubit: usize,
    #[source]
    pub source: TensorError,
}

impl ContractionError {
    fn at(stage: usize) -> impl Fn(SiteError) -> Self {
        move |SiteError { qubit, source }| Self {
            stage,
            qubit,
            source,
        }
    }
}

/// Push `tensor` through one layer: every coupling in pair order, then every dressing gate.
pub fn contract_layer(
    tensor: &mut PropagatedTensor,
    layer: &CircuitLayer,
    stage: usize,
) -> Result<(), ContractionError> {
    for coupling in &layer.couplings {
        tensor
            .apply_coupling(coupling.qubits, coupling.gate)
            .map_err(ContractionError::at(stage))?;
    }
    for (qubit, gate) in layer.dressing.iter().enumerate() {
        tensor
            .apply_single(qubit, *gate)
            .map_err(ContractionError::at(stage))?;
    }
    Ok(())
}

pub fn contract_rotation(
    tensor: &mut PropagatedTensor,
    rotation: &[SingleQubitGate],
    stage: usize,
) -> Result<(), ContractionError> {
    for (qubit, gate) in rotation.iter().enumerate() {
        tensor
            .apply_single(qubit, *gate)
            .map_err(ContractionError::at(stage))?;
    }
    Ok(())
}

/// Contract a single stage of `circuit`. Stage `circuit.depth()` is the basis rotation.
///
/// Fails without touching `tensor` when it does not span the qubits of `circuit`.
///
/// # Panics
///
/// If `stage` is not a stage of `circuit`.
pub fn contract_stage(
    tensor: &mut PropagatedTensor,
    circuit: &MeasurementCircuit,
    stage: usize,
) -> Result<(), ContractionError> {
    if tensor.qubits() != circuit.qubits() {
        return Err(ContractionError {
            stage,
            qubit: tensor.qubits().min(circuit.qubits()),
            source: TensorError::QubitCountMismatch {
                tensor: tensor.qubits(),
                circuit: circuit.qubits(),
            },
        });
    }
    match circuit.layers().get(stage) {
        Some(layer) => contract_layer(tensor, layer, stage),
        None => {
            assert_eq!(stage, circuit.depth(), "stage out of range");
            contract_rotation(tensor, circuit.basis_rotation(), stage)
        }
    }
}

/// Contract every stage from `first_stage` through the basis rotation.
pub fn contract_from(
    tensor: &mut PropagatedTensor,
    circuit: &MeasurementCircuit,
    first_stage: usize,
) -> Result<(), ContractionError> {
    for stage in first_stage..circuit.stages() {
        contract_stage(tensor, circuit, stage)?;
    }
    Ok(())
}

/// Success proxy of `observable` under the whole of `circuit`.
pub fn success_probability(
    observable: &PauliString,
    circuit: &MeasurementCircuit,
) -> Result<f64, ContractionError> {
    let mut tensor = PropagatedTensor::for_observable(observable);
    contract_from(&mut tensor, circuit, 0)?;
    Ok(tensor.success_probability())
}

#[cfg(test)]
mod tests {
    use dss_common::{GateChoice, Slot, TwoQubitGate};

    use super::*;

    fn specified(qubits: usize, depth: usize) -> MeasurementCircuit {
        let mut circuit = MeasurementCircuit::randomized(qubits, depth);
        for layer in 0..depth {
            for pair in 0..circuit.layers()[layer].couplings.len() {
                circuit.assign(
                    Slot::Coupling { layer, pair },
                    GateChoice::Two(TwoQubitGate::Identity),
                );
            }
            for qubit in 0..qubits {
                circuit.assign(
                    Slot::Dressing { layer, qubit },
                    GateChoice::Single(SingleQubitGate::Identity),
                );
            }
        }
        for qubit in 0..qubits {
            circuit.assign(
                Slot::BasisRotation { qubit },
                GateChoice::Single(SingleQubitGate::Identity),
            );
        }
        circuit
    }

    #[test]
    fn identity_circuit_learns_only_diagonal_strings() {
        let circuit = specified(3, 2);
        assert!(circuit.is_fully_specified());
        let zz: PauliString = "ZIZ".parse().unwrap();
        let xz: PauliString = "XIZ".parse().unwrap();
        assert_eq!(1.0, success_probability(&zz, &circuit).unwrap());
        assert_eq!(0.0, success_probability(&xz, &circuit).unwrap());
    }

    #[test]
    fn hadamard_rotation_learns_x() {
        let mut circuit = specified(2, 1);
        circuit.assign(
            Slot::BasisRotation { qubit: 0 },
            GateChoice::Single(SingleQubitGate::Hadamard),
        );
        let xz: PauliString = "XZ".parse().unwrap();
        assert_eq!(1.0, success_probability(&xz, &circuit).unwrap());
    }

    #[test]
    fn cnot_converts_xx_to_xi() {
        let mut circuit = specified(2, 1);
        circuit.assign(
            Slot::Coupling { layer: 0, pair: 0 },
            GateChoice::Two(TwoQubitGate::Cnot),
        );
        let xx: PauliString = "XX".parse().unwrap();
        let mut tensor = PropagatedTensor::for_observable(&xx);
        contract_stage(&mut tensor, &circuit, 0).unwrap();
        assert_eq!(1.0, tensor.site(0).weight(dss_common::Pauli::X));
        assert_eq!(1.0, tensor.site(1).weight(dss_common::Pauli::I));
    }

    #[test]
    fn fully_specified_proxy_is_binary() {
        let circuit = specified(4, 2);
        for label in ["XYZI", "ZZZZ", "IIIZ", "YIII"] {
            let observable: PauliString = label.parse().unwrap();
            let p = success_probability(&observable, &circuit).unwrap();
            assert!(p == 0.0 || p == 1.0, "{label}: {p}");
        }
    }

    #[test]
    fn randomized_circuit_proxy_lies_in_unit_interval() {
        let circuit = MeasurementCircuit::randomized(5, 3);
        let observable: PauliString = "XIYZI".parse().unwrap();
        let p = success_probability(&observable, &circuit).unwrap();
        assert!(p > 0.0 && p < 1.0);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let circuit = specified(3, 1);
        for label in ["XY", "XYZI"] {
            let observable: PauliString = label.parse().unwrap();
            let err = success_probability(&observable, &circuit).unwrap_err();
            assert_eq!(0, err.stage);
            assert_eq!(
                TensorError::QubitCountMismatch {
                    tensor: label.len(),
                    circuit: 3,
                },
                err.source
            );
        }
    }

    #[test]
    fn couplings_off_the_register_are_rejected() {
        let observable: PauliString = "XY".parse().unwrap();
        let mut tensor = PropagatedTensor::for_observable(&observable);
        let layer = CircuitLayer {
            couplings: vec![dss_common::Coupling {
                qubits: (1, 2),
                gate: TwoQubitGate::Swap,
            }],
            dressing: vec![SingleQubitGate::Identity; 2],
        };
        let err = contract_layer(&mut tensor, &layer, 4).unwrap_err();
        assert_eq!(
            ContractionError {
                stage: 4,
                qubit: 2,
                source: TensorError::MissingSite { sites: 2 },
            },
            err
        );
    }

    #[test]
    fn prefix_then_suffix_equals_full_contraction() {
        let circuit = MeasurementCircuit::randomized(4, 3);
        let observable: PauliString = "XYIZ".parse().unwrap();

        let mut split = PropagatedTensor::for_observable(&observable);
        contract_stage(&mut split, &circuit, 0).unwrap();
        contract_stage(&mut split, &circuit, 1).unwrap();
        contract_from(&mut split, &circuit, 2).unwrap();

        let mut whole = PropagatedTensor::for_observable(&observable);
        contract_from(&mut whole, &circuit, 0).unwrap();
        assert_eq!(whole, split);
    }
}
