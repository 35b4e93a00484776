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

use dss_common::{
    brickwork_pairs, GateChoice, MeasurementCircuit, SingleQubitGate, Slot, TwoQubitGate,
};

/// The order in which the engine decides the slots of a circuit.
///
/// Layer by layer: every coupling in pair order, then every dressing gate in qubit order.
/// The basis rotation comes last, again in qubit order. Greedy results depend on this order.
pub fn slot_schedule(qubits: usize, depth: usize) -> Vec<Slot> {
    let mut slots = Vec::new();
    for layer in 0..depth {
        let pairs = brickwork_pairs(qubits, layer).len();
        slots.extend((0..pairs).map(|pair| Slot::Coupling { layer, pair }));
        slots.extend((0..qubits).map(|qubit| Slot::Dressing { layer, qubit }));
    }
    slots.extend((0..qubits).map(|qubit| Slot::BasisRotation { qubit }));
    slots
}

/// [`slot_schedule`] for the shape of `circuit`.
pub fn schedule_for(circuit: &MeasurementCircuit) -> Vec<Slot> {
    slot_schedule(circuit.qubits(), circuit.depth())
}

/// Catalog entries that may fill `slot`, in tie-break order.
pub fn candidates(slot: Slot) -> Vec<GateChoice> {
    if slot.is_two_qubit() {
        TwoQubitGate::CANDIDATES.map(GateChoice::Two).to_vec()
    } else {
        SingleQubitGate::CANDIDATES.map(GateChoice::Single).to_vec()
    }
}
