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

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::gates::{GateChoice, SingleQubitGate, TwoQubitGate};

/// Qubit pairs coupled by layer `layer` of a brickwork on a ring of `qubits` qubits.
///
/// Even layers pair `(0,1), (2,3), ...`, odd layers pair `(1,2), (3,4), ...` and wrap
/// around to qubit 0 when `qubits` is even. Pairs within one layer never overlap.
pub fn brickwork_pairs(qubits: usize, layer: usize) -> Vec<(usize, usize)> {
    let offset = layer % 2;
    (0..qubits / 2)
        .map(|i| {
            (
                (2 * i + offset) % qubits,
                (2 * i + 1 + offset) % qubits,
            )
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupling {
    pub qubits: (usize, usize),
    pub gate: TwoQubitGate,
}

/// One depth unit: a matching of two-qubit couplings followed by one single-qubit gate
/// per qubit (the dressing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitLayer {
    pub couplings: Vec<Coupling>,
    pub dressing: Vec<SingleQubitGate>,
}

impl CircuitLayer {
    /// Brickwork layer `index` with every slot still random.
    pub fn randomized(qubits: usize, index: usize) -> Self {
        let couplings = brickwork_pairs(qubits, index)
            .into_iter()
            .map(|pair| Coupling {
                qubits: pair,
                gate: TwoQubitGate::Twirl,
            })
            .collect();
        Self {
            couplings,
            dressing: vec![SingleQubitGate::Twirl; qubits],
        }
    }

    pub fn is_fully_specified(&self) -> bool {
        self.couplings.iter().all(|c| !c.gate.is_placeholder())
            && self.dressing.iter().all(|g| !g.is_placeholder())
    }

    /// Every qubit is in range, in at most one coupling, and has exactly one dressing gate.
    pub fn is_valid(&self, qubits: usize) -> bool {
        let mut covered = vec![false; qubits];
        for Coupling { qubits: (a, b), .. } in &self.couplings {
            if *a >= qubits || *b >= qubits || a == b || covered[*a] || covered[*b] {
                return false;
            }
            covered[*a] = true;
            covered[*b] = true;
        }
        self.dressing.len() == qubits
    }
}

/// A gate position inside a [`MeasurementCircuit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Coupling { layer: usize, pair: usize },
    Dressing { layer: usize, qubit: usize },
    BasisRotation { qubit: usize },
}

impl Slot {
    /// Index of the stage holding this slot; the basis rotation is stage `depth`.
    pub fn stage(&self, depth: usize) -> usize {
        match self {
            Slot::Coupling { layer, .. } | Slot::Dressing { layer, .. } => *layer,
            Slot::BasisRotation { .. } => depth,
        }
    }

    pub fn is_two_qubit(&self) -> bool {
        matches!(self, Slot::Coupling { .. })
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Coupling { layer, pair } => write!(f, "layer {layer} coupling {pair}"),
            Slot::Dressing { layer, qubit } => write!(f, "layer {layer} dressing q{qubit}"),
            Slot::BasisRotation { qubit } => write!(f, "basis rotation q{qubit}"),
        }
    }
}

/// A depth-`d` measurement circuit followed by computational-basis readout.
///
/// Execution order on the device is `layers[0]` through `layers[d-1]` (couplings, then
/// dressing), then the terminal `basis_rotation`, then readout of every qubit in Z.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementCircuit {
    qubits: usize,
    layers: Vec<CircuitLayer>,
    basis_rotation: Vec<SingleQubitGate>,
}

impl MeasurementCircuit {
    /// The fully randomized circuit: every slot holds its placeholder.
    pub fn randomized(qubits: usize, depth: usize) -> Self {
        Self {
            qubits,
            layers: (0..depth)
                .map(|i| CircuitLayer::randomized(qubits, i))
                .collect(),
            basis_rotation: vec![SingleQubitGate::Twirl; qubits],
        }
    }

    pub fn qubits(&self) -> usize {
        self.qubits
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[CircuitLayer] {
        &self.layers
    }

    pub fn basis_rotation(&self) -> &[SingleQubitGate] {
        &self.basis_rotation
    }

    /// Number of stages: one per layer plus the basis rotation.
    pub fn stages(&self) -> usize {
        self.layers.len() + 1
    }

    pub fn get(&self, slot: Slot) -> Option<GateChoice> {
        match slot {
            Slot::Coupling { layer, pair } => self
                .layers
                .get(layer)?
                .couplings
                .get(pair)
                .map(|c| GateChoice::Two(c.gate)),
            Slot::Dressing { layer, qubit } => self
                .layers
                .get(layer)?
                .dressing
                .get(qubit)
                .map(|g| GateChoice::Single(*g)),
            Slot::BasisRotation { qubit } => {
                self.basis_rotation.get(qubit).map(|g| GateChoice::Single(*g))
            }
        }
    }

    /// Place `choice` in `slot`. Returns false, leaving the circuit untouched, when the slot
    /// does not exist or the gate arity does not fit it.
    pub fn assign(&mut self, slot: Slot, choice: GateChoice) -> bool {
        match (slot, choice) {
            (Slot::Coupling { layer, pair }, GateChoice::Two(gate)) => {
                match self
                    .layers
                    .get_mut(layer)
                    .and_then(|l| l.couplings.get_mut(pair))
                {
                    Some(coupling) => {
                        coupling.gate = gate;
                        true
                    }
                    None => false,
                }
            }
            (Slot::Dressing { layer, qubit }, GateChoice::Single(gate)) => {
                match self
                    .layers
                    .get_mut(layer)
                    .and_then(|l| l.dressing.get_mut(qubit))
                {
                    Some(g) => {
                        *g = gate;
                        true
                    }
                    None => false,
                }
            }
            (Slot::BasisRotation { qubit }, GateChoice::Single(gate)) => {
                match self.basis_rotation.get_mut(qubit) {
                    Some(g) => {
                        *g = gate;
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    pub fn is_fully_specified(&self) -> bool {
        self.layers.iter().all(CircuitLayer::is_fully_specified)
            && self.basis_rotation.iter().all(|g| !g.is_placeholder())
    }

    /// Count of two-qubit couplings that are not the identity.
    pub fn entangling_gates(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|l| l.couplings.iter())
            .filter(|c| c.gate != TwoQubitGate::Identity)
            .count()
    }
}

impl Display for MeasurementCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, layer) in self.layers.iter().enumerate() {
            write!(f, "L{i}: ")?;
            for c in &layer.couplings {
                write!(f, "{}({},{}) ", c.gate, c.qubits.0, c.qubits.1)?;
            }
            write!(f, "| ")?;
            for g in &layer.dressing {
                write!(f, "{g} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "R: ")?;
        for g in &self.basis_rotation {
            write!(f, "{g} ")?;
        }
        write!(f, "| measure Z")
    }
}
