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

use dss_common::{PauliString, SingleQubitGate, TwoQubitGate};
use nalgebra::Vector4;

use crate::local::{LocalTensor, TensorError};

/// Per-qubit Pauli weight of one observable at the current contraction boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct PropagatedTensor {
    sites: Vec<LocalTensor>,
    clamped: usize,
}

/// A site that left the probability simplex, with the qubit it sits on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SiteError {
    pub qubit: usize,
    pub source: TensorError,
}

impl PropagatedTensor {
    /// The boundary before any gate: every site is a point mass on the observable's label.
    pub fn for_observable(observable: &PauliString) -> Self {
        Self {
            sites: observable.iter().map(|p| LocalTensor::pure(*p)).collect(),
            clamped: 0,
        }
    }

    pub fn qubits(&self) -> usize {
        self.sites.len()
    }

    pub fn site(&self, qubit: usize) -> &LocalTensor {
        &self.sites[qubit]
    }

    /// How many site updates were clamped back into the simplex so far.
    pub fn clamped(&self) -> usize {
        self.clamped
    }

    /// Probability that a Z readout of every qubit learns the observable, treating sites as
    /// independent.
    pub fn success_probability(&self) -> f64 {
        self.sites
            .iter()
            .map(LocalTensor::readout_probability)
            .product()
    }

    pub(crate) fn apply_single(
        &mut self,
        qubit: usize,
        gate: SingleQubitGate,
    ) -> Result<(), SiteError> {
        let weights = self.site_checked(qubit)?.apply(gate);
        self.store(qubit, weights)
    }

    /// Merge the two sites, push the joint weight through `gate` and keep the marginals.
    pub(crate) fn apply_coupling(
        &mut self,
        (a, b): (usize, usize),
        gate: TwoQubitGate,
    ) -> Result<(), SiteError> {
        let joint = self.site_checked(a)?.merge(self.site_checked(b)?).apply(gate);
        let (first, second) = joint.marginalize();
        self.store(a, first)?;
        self.store(b, second)
    }

    fn site_checked(&self, qubit: usize) -> Result<&LocalTensor, SiteError> {
        self.sites.get(qubit).ok_or(SiteError {
            qubit,
            source: TensorError::MissingSite {
                sites: self.sites.len(),
            },
        })
    }

    fn store(&mut self, qubit: usize, weights: Vector4<f64>) -> Result<(), SiteError> {
        let (tensor, clamped) =
            LocalTensor::checked(weights).map_err(|source| SiteError { qubit, source })?;
        self.sites[qubit] = tensor;
        self.clamped += usize::from(clamped);
        Ok(())
    }
}
