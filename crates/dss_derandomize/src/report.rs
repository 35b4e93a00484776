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

use std::io;

use serde::Serialize;

use crate::{config::DssConfig, engine::DerandomizationOutcome};

/// One row of the per-observable coverage report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRow {
    pub index: usize,
    pub observable: String,
    pub weight: f64,
    pub hits: usize,
    pub remaining: usize,
}

pub fn coverage_rows(config: &DssConfig, outcome: &DerandomizationOutcome) -> Vec<CoverageRow> {
    let target = config.measurements_per_observable();
    config
        .observables()
        .iter()
        .zip(config.weights())
        .zip(&outcome.remaining_measurements)
        .enumerate()
        .map(|(index, ((observable, weight), remaining))| CoverageRow {
            index,
            observable: observable.to_string(),
            weight: *weight,
            hits: target - remaining,
            remaining: *remaining,
        })
        .collect()
}

/// Write `rows` as CSV with a header line.
pub fn write_coverage<W: io::Write>(writer: W, rows: &[CoverageRow]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    rows.iter().try_for_each(|row| wtr.serialize(row))?;
    wtr.flush()?;
    Ok(())
}
