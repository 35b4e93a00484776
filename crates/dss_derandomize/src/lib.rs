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

//! Derandomized shallow shadows.
//!
//! Designs a sequence of depth-bounded brickwork measurement circuits that learn a set of
//! weighted Pauli observables. Circuits are built greedily slot by slot, each candidate gate
//! scored by a cost computed from local Pauli-weight contraction (see [`dss_tensor`]).
//!
//! ```no_run
//! use dss_derandomize::{derandomize, load_pauli_strings, DssConfig};
//!
//! let observables = load_pauli_strings("XX\nZI\n".as_bytes())?;
//! let config = DssConfig::new(2, 1, 0.9, 10, 2, observables, None)?;
//! let outcome = derandomize(&config)?;
//! for circuit in outcome.circuits() {
//!     println!("{circuit}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod cost;
pub mod engine;
pub mod error;
pub mod input;
pub mod registry;
pub mod report;
pub mod schedule;

pub use config::DssConfig;
pub use cost::{CostEvaluator, HIT_THRESHOLD};
pub use engine::{DerandomizationOutcome, Derandomizer, EngineState, RoundRecord, Termination};
pub use error::{ConfigError, DerandomizeError};
pub use input::{load_pauli_strings, load_weights, InputError};
pub use registry::{ObservableRegistry, ObservableState};
pub use schedule::{candidates, slot_schedule};

/// Run the engine on `config` until it terminates, scoring candidates in parallel.
pub fn derandomize(config: &DssConfig) -> Result<DerandomizationOutcome, DerandomizeError> {
    Derandomizer::new(config)?.run()
}
