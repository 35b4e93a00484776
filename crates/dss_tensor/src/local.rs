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

use dss_common::{Pauli, SingleQubitGate, TwoQubitGate};
use log::trace;
use nalgebra::{SVector, Vector4};
use thiserror::Error;

use crate::transfer::{PairTransfer, SingleTransfer};

/// Largest violation of the probability simplex that is clamped instead of rejected.
pub const TOLERANCE: f64 = 1e-9;

pub type JointWeights = SVector<f64, 16>;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TensorError {
    #[error("weight on {label} is not finite ({value})")]
    NotFinite { label: Pauli, value: f64 },
    #[error("weight on {label} is {value}, outside [0, 1] beyond tolerance")]
    OutOfRange { label: Pauli, value: f64 },
    #[error("weights sum to {total} instead of 1")]
    NotNormalized { total: f64 },
    #[error("no such site among {sites}")]
    MissingSite { sites: usize },
    #[error("tensor over {tensor} qubits contracted with a circuit over {circuit}")]
    QubitCountMismatch { tensor: usize, circuit: usize },
}

/// Probability distribution over the Pauli label {I, X, Y, Z} carried by one qubit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTensor(Vector4<f64>);

impl LocalTensor {
    /// All weight on `p`.
    pub fn pure(p: Pauli) -> Self {
        let mut weights = Vector4::zeros();
        weights[p.index()] = 1.0;
        Self(weights)
    }

    /// Validate raw weights. Entries within [`TOLERANCE`] of the simplex are clamped and
    /// renormalized, which is reported by the returned flag.
    pub fn checked(weights: Vector4<f64>) -> Result<(Self, bool), TensorError> {
        let mut clamped = false;
        for (i, value) in weights.iter().enumerate() {
            let label = Pauli::ALL[i];
            if !value.is_finite() {
                return Err(TensorError::NotFinite {
                    label,
                    value: *value,
                });
            }
            if *value < -TOLERANCE || *value > 1.0 + TOLERANCE {
                return Err(TensorError::OutOfRange {
                    label,
                    value: *value,
                });
            }
            clamped |= *value < 0.0 || *value > 1.0;
        }
        let total = weights.sum();
        if (total - 1.0).abs() > TOLERANCE {
            return Err(TensorError::NotNormalized { total });
        }
        if !clamped {
            return Ok((Self(weights), false));
        }
        let bounded = weights.map(|v| v.clamp(0.0, 1.0));
        let bounded = bounded / bounded.sum();
        trace!("Clamped local tensor {:?} to {:?}", weights, bounded);
        Ok((Self(bounded), true))
    }

    pub fn weight(&self, p: Pauli) -> f64 {
        self.0[p.index()]
    }

    pub fn weights(&self) -> &Vector4<f64> {
        &self.0
    }

    /// Probability that a Z readout learns this site: weight on I plus weight on Z.
    pub fn readout_probability(&self) -> f64 {
        Pauli::ALL
            .into_iter()
            .filter(|p| p.is_diagonal())
            .map(|p| self.0[p.index()])
            .sum()
    }

    /// Apply a single-qubit gate. The result is unchecked.
    pub fn apply(&self, gate: SingleQubitGate) -> Vector4<f64> {
        match SingleTransfer::from(gate) {
            SingleTransfer::Permute(images) => {
                let mut out = Vector4::zeros();
                for (from, to) in images.into_iter().enumerate() {
                    out[to] += self.0[from];
                }
                out
            }
            SingleTransfer::Twirl => {
                let spread = (self.0[1] + self.0[2] + self.0[3]) / 3.0;
                Vector4::new(self.0[0], spread, spread, spread)
            }
        }
    }

    /// Joint distribution of two independent sites, indexed `4 * a + b`.
    pub fn merge(&self, other: &LocalTensor) -> JointTensor {
        JointTensor(JointWeights::from_fn(|i, _| self.0[i / 4] * other.0[i % 4]))
    }
}

/// Joint distribution over the 16 two-qubit labels of a coupled pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointTensor(JointWeights);

impl JointTensor {
    pub fn weights(&self) -> &JointWeights {
        &self.0
    }

    pub fn apply(&self, gate: TwoQubitGate) -> JointTensor {
        match PairTransfer::from(gate) {
            PairTransfer::Permute(images) => {
                let mut out = JointWeights::zeros();
                for (from, to) in images.into_iter().enumerate() {
                    out[to] += self.0[from];
                }
                JointTensor(out)
            }
            PairTransfer::Twirl => {
                let spread = (self.0.sum() - self.0[0]) / 15.0;
                let mut out = JointWeights::repeat(spread);
                out[0] = self.0[0];
                JointTensor(out)
            }
        }
    }

    /// Forget the correlations and keep the two single-site marginals. The results are
    /// unchecked.
    pub fn marginalize(&self) -> (Vector4<f64>, Vector4<f64>) {
        let first = Vector4::from_fn(|a, _| (0..4).map(|b| self.0[4 * a + b]).sum::<f64>());
        let second = Vector4::from_fn(|b, _| (0..4).map(|a| self.0[4 * a + b]).sum::<f64>());
        (first, second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use Pauli::{I, X, Y, Z};

    #[test]
    fn pure_tensor_readout() {
        assert_eq!(1.0, LocalTensor::pure(I).readout_probability());
        assert_eq!(1.0, LocalTensor::pure(Z).readout_probability());
        assert_eq!(0.0, LocalTensor::pure(X).readout_probability());
        assert_eq!(0.0, LocalTensor::pure(Y).readout_probability());
    }

    #[test]
    fn hadamard_moves_x_to_z() {
        let out = LocalTensor::pure(X).apply(SingleQubitGate::Hadamard);
        assert_eq!(Vector4::new(0.0, 0.0, 0.0, 1.0), out);
    }

    #[test]
    fn twirl_spreads_non_identity_weight() {
        let (t, _) = LocalTensor::checked(Vector4::new(0.25, 0.75, 0.0, 0.0)).unwrap();
        let out = t.apply(SingleQubitGate::Twirl);
        assert_eq!(0.25, out[0]);
        for i in 1..4 {
            assert!((out[i] - 0.25).abs() < 1e-15);
        }
    }

    #[test]
    fn merge_then_marginalize_recovers_sites() {
        let (a, _) = LocalTensor::checked(Vector4::new(0.1, 0.2, 0.3, 0.4)).unwrap();
        let (b, _) = LocalTensor::checked(Vector4::new(0.5, 0.0, 0.25, 0.25)).unwrap();
        let (ma, mb) = a.merge(&b).marginalize();
        assert!((ma - a.weights()).norm() < 1e-12);
        assert!((mb - b.weights()).norm() < 1e-12);
    }

    #[test]
    fn cnot_on_joint_tensor() {
        let joint = LocalTensor::pure(X).merge(&LocalTensor::pure(I));
        let (a, b) = joint.apply(TwoQubitGate::Cnot).marginalize();
        assert_eq!(LocalTensor::pure(X).weights(), &a);
        assert_eq!(LocalTensor::pure(X).weights(), &b);
    }

    #[test]
    fn pair_twirl_fixes_identity_only() {
        let joint = LocalTensor::pure(I).merge(&LocalTensor::pure(I));
        assert_eq!(joint, joint.apply(TwoQubitGate::Twirl));

        let joint = LocalTensor::pure(Z).merge(&LocalTensor::pure(I));
        let twirled = joint.apply(TwoQubitGate::Twirl);
        assert_eq!(0.0, twirled.weights()[0]);
        assert!((twirled.weights().sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn checked_clamps_within_tolerance() {
        let (t, clamped) =
            LocalTensor::checked(Vector4::new(-1e-12, 0.5, 0.5 + 1e-12, 0.0)).unwrap();
        assert!(clamped);
        assert!(t.weights().iter().all(|v| (0.0..=1.0).contains(v)));
        assert!((t.weights().sum() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn checked_rejects_invalid_weights() {
        assert!(matches!(
            LocalTensor::checked(Vector4::new(-0.1, 0.6, 0.5, 0.0)),
            Err(TensorError::OutOfRange { label: I, .. })
        ));
        assert!(matches!(
            LocalTensor::checked(Vector4::new(0.5, 0.5, 0.5, 0.0)),
            Err(TensorError::NotNormalized { .. })
        ));
        assert!(matches!(
            LocalTensor::checked(Vector4::new(0.5, f64::NAN, 0.5, 0.0)),
            Err(TensorError::NotFinite { label: X, .. })
        ));
        assert!(LocalTensor::checked(Vector4::new(0.0, 0.0, 1.0, 0.0)).is_ok());
    }
}
