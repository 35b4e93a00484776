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

use std::collections::BTreeSet;

use dss_common::{Pauli, PauliString};
use rand::{
    distr::{Distribution, StandardUniform},
    rngs::StdRng,
    Rng, SeedableRng,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("observables need at least one qubit")]
    NoQubits,
    #[error("cannot draw {count} distinct strings on {qubits} qubits")]
    TooFewStrings { count: usize, qubits: usize },
}

/// Infinite iterator of random Pauli strings on `qubits` qubits, skipping the identity.
pub fn random_pauli_strings<R: Rng>(qubits: usize, rng: R) -> impl Iterator<Item = PauliString> {
    random_paulis(rng)
        .scan(vec![], move |buf: &mut Vec<Pauli>, p| {
            buf.push(p);
            if buf.len() == qubits {
                Some(Some(PauliString::new(std::mem::take(buf))))
            } else {
                Some(None)
            }
        })
        .flatten()
        // Remove strings that are all identity
        .filter(|ps| !ps.is_identity())
}

/// `count` distinct random observables in the order they were drawn. Reproducible for a given
/// `seed`. Fails when there are fewer than `count` non-identity strings on `qubits` qubits.
pub fn distinct_observables(
    qubits: usize,
    count: usize,
    seed: u64,
) -> Result<Vec<PauliString>, DrawError> {
    if qubits == 0 {
        return Err(DrawError::NoQubits);
    }
    // 4^qubits - 1, saturating once it no longer fits
    let available = u32::try_from(qubits)
        .ok()
        .and_then(|q| 4usize.checked_pow(q))
        .map_or(usize::MAX, |n| n - 1);
    if count > available {
        return Err(DrawError::TooFewStrings { count, qubits });
    }
    let mut seen = BTreeSet::new();
    Ok(random_pauli_strings(qubits, StdRng::seed_from_u64(seed))
        .filter(|ps| seen.insert(ps.clone()))
        .take(count)
        .collect())
}

fn random_paulis<R: Rng>(rng: R) -> impl Iterator<Item = Pauli> {
    StandardUniform.sample_iter(rng)
}
