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

use std::fmt;

use dss_common::{GateChoice, MeasurementCircuit, Slot};
use dss_tensor::{contract_stage, PropagatedTensor};
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    config::DssConfig,
    cost::{CostEvaluator, ObservableFault, HIT_THRESHOLD},
    error::DerandomizeError,
    registry::ObservableRegistry,
    schedule::{candidates, schedule_for},
};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// `total_measurements` circuits were produced.
    BudgetExhausted,
    AllObservablesLearned,
    /// Stopped from outside through [`Derandomizer::finish`].
    Interrupted,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Termination::BudgetExhausted => "measurement budget exhausted",
            Termination::AllObservablesLearned => "all observables learned",
            Termination::Interrupted => "interrupted",
        };
        write!(f, "{text}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Deciding the slots of stage `stage` of circuit `round`.
    BuildingLayer { round: usize, stage: usize },
    /// Every slot of circuit `round` is decided and its hits are not yet credited.
    CircuitComplete { round: usize },
    Done(Termination),
}

/// One finalized circuit and the observables it was credited with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundRecord {
    pub round: usize,
    pub circuit: MeasurementCircuit,
    pub hits: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerandomizationOutcome {
    pub rounds: Vec<RoundRecord>,
    /// Final counters, indexed like the configured observables.
    pub remaining_measurements: Vec<usize>,
    pub termination: Termination,
    /// Tensor entries clamped back into range in committed contractions.
    pub clamped: usize,
}

impl DerandomizationOutcome {
    pub fn circuits(&self) -> impl Iterator<Item = &MeasurementCircuit> {
        self.rounds.iter().map(|r| &r.circuit)
    }

    pub fn total_hits(&self) -> usize {
        self.rounds.iter().map(|r| r.hits.len()).sum()
    }
}

/// Greedy construction of measurement circuits, one slot per [`Derandomizer::step`].
///
/// Every slot is decided by scoring each catalog candidate with all later slots still random
/// and committing the cheapest, the earliest candidate winning ties. Each observable's tensor
/// is kept contracted up to the current stage so candidates only contract what remains.
pub struct Derandomizer<'a> {
    config: &'a DssConfig,
    registry: ObservableRegistry,
    evaluator: CostEvaluator,
    schedule: Vec<Slot>,
    next_slot: usize,
    circuit: MeasurementCircuit,
    snapshots: Vec<(usize, PropagatedTensor)>,
    rounds: Vec<RoundRecord>,
    state: EngineState,
    parallel: bool,
    clamped: usize,
}

fn instability(round: usize, slot: Option<Slot>, fault: ObservableFault) -> DerandomizeError {
    DerandomizeError::NumericalInstability {
        round,
        slot,
        observable: fault.observable,
        source: fault.source,
    }
}

impl<'a> Derandomizer<'a> {
    pub fn new(config: &'a DssConfig) -> Result<Self, DerandomizeError> {
        config.validate()?;
        let evaluator = CostEvaluator::new(config).map_err(|f| instability(0, None, f))?;
        let circuit = MeasurementCircuit::randomized(config.qubits(), config.depth());
        let schedule = schedule_for(&circuit);
        let mut engine = Self {
            config,
            registry: ObservableRegistry::new(config),
            evaluator,
            schedule,
            next_slot: 0,
            circuit,
            snapshots: Vec::new(),
            rounds: Vec::new(),
            state: EngineState::BuildingLayer { round: 0, stage: 0 },
            parallel: true,
            clamped: 0,
        };
        engine.start_round();
        Ok(engine)
    }

    /// Score candidates on the rayon pool (the default) or on the calling thread.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn config(&self) -> &DssConfig {
        self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn registry(&self) -> &ObservableRegistry {
        &self.registry
    }

    pub fn evaluator(&self) -> &CostEvaluator {
        &self.evaluator
    }

    /// The circuit under construction. Undecided slots hold placeholders.
    pub fn circuit(&self) -> &MeasurementCircuit {
        &self.circuit
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    /// Perform one transition and return the new state. Does nothing once done.
    pub fn step(&mut self) -> Result<EngineState, DerandomizeError> {
        match self.state {
            EngineState::BuildingLayer { round, stage } => self.decide_slot(round, stage)?,
            EngineState::CircuitComplete { round } => self.complete_circuit(round),
            EngineState::Done(_) => {}
        }
        Ok(self.state)
    }

    pub fn run(mut self) -> Result<DerandomizationOutcome, DerandomizeError> {
        while !matches!(self.state, EngineState::Done(_)) {
            self.step()?;
        }
        Ok(self.finish())
    }

    /// Stop and report. A circuit that is not complete and credited is dropped, and the
    /// termination is [`Termination::Interrupted`] unless the run had already finished.
    pub fn finish(self) -> DerandomizationOutcome {
        let termination = match self.state {
            EngineState::Done(termination) => termination,
            _ => {
                info!("Interrupted after {} circuits", self.rounds.len());
                Termination::Interrupted
            }
        };
        DerandomizationOutcome {
            rounds: self.rounds,
            remaining_measurements: self.registry.remaining_measurements(),
            termination,
            clamped: self.clamped,
        }
    }

    fn start_round(&mut self) {
        self.circuit = MeasurementCircuit::randomized(self.config.qubits(), self.config.depth());
        self.next_slot = 0;
        let observables = self.config.observables();
        self.snapshots = self
            .registry
            .active()
            .map(|i| (i, PropagatedTensor::for_observable(&observables[i])))
            .collect();
    }

    fn decide_slot(&mut self, round: usize, stage: usize) -> Result<(), DerandomizeError> {
        let slot = self.schedule[self.next_slot];
        let choices = candidates(slot);
        let score = |choice: &GateChoice| {
            let mut trial = self.circuit.clone();
            trial.assign(slot, *choice);
            self.evaluator
                .evaluate(&self.registry, &self.snapshots, &trial, stage, round)
        };
        let costs: Vec<_> = if self.parallel {
            choices.par_iter().map(score).collect()
        } else {
            choices.iter().map(score).collect()
        };

        let mut best: Option<(GateChoice, f64)> = None;
        for (choice, cost) in choices.iter().zip(costs) {
            let cost = cost.map_err(|f| instability(round, Some(slot), f))?;
            trace!("{slot}: {choice} costs {cost}");
            if best.is_none_or(|(_, lowest)| cost < lowest) {
                best = Some((*choice, cost));
            }
        }
        if let Some((choice, cost)) = best {
            self.circuit.assign(slot, choice);
            debug!("Round {round}: {slot} set to {choice} at cost {cost}");
        }

        self.next_slot += 1;
        let depth = self.config.depth();
        let next_stage = self.schedule.get(self.next_slot).map(|s| s.stage(depth));
        if next_stage != Some(stage) {
            self.advance_snapshots(round, stage)?;
        }
        self.state = match next_stage {
            Some(stage) => EngineState::BuildingLayer { round, stage },
            None => EngineState::CircuitComplete { round },
        };
        Ok(())
    }

    /// Contract every snapshot through the now fully decided `stage`.
    fn advance_snapshots(&mut self, round: usize, stage: usize) -> Result<(), DerandomizeError> {
        for (observable, tensor) in &mut self.snapshots {
            contract_stage(tensor, &self.circuit, stage).map_err(|source| {
                DerandomizeError::NumericalInstability {
                    round,
                    slot: None,
                    observable: *observable,
                    source,
                }
            })?;
        }
        Ok(())
    }

    fn complete_circuit(&mut self, round: usize) {
        let mut clamped = 0;
        let mut hits = Vec::new();
        for (observable, tensor) in &self.snapshots {
            clamped += tensor.clamped();
            if tensor.success_probability() >= HIT_THRESHOLD {
                hits.push(*observable);
            }
        }
        hits.retain(|i| self.registry.record_hit(*i));
        if clamped > 0 {
            warn!("Round {round}: clamped {clamped} tensor entries into range");
        }
        self.clamped += clamped;
        info!(
            "Round {round}: hit {} observables with {} entangling gates, {} still active",
            hits.len(),
            self.circuit.entangling_gates(),
            self.registry.active_count()
        );
        self.rounds.push(RoundRecord {
            round,
            circuit: self.circuit.clone(),
            hits,
        });

        self.state = if self.registry.all_learned() {
            EngineState::Done(Termination::AllObservablesLearned)
        } else if self.rounds.len() >= self.config.total_measurements() {
            EngineState::Done(Termination::BudgetExhausted)
        } else {
            self.start_round();
            EngineState::BuildingLayer {
                round: round + 1,
                stage: 0,
            }
        };
        if let EngineState::Done(termination) = self.state {
            info!("Finished after {} circuits: {termination}", self.rounds.len());
        }
    }
}
