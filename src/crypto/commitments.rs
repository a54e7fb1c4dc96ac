// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Hash commit/decommit pairs.
//!
//! `C = H(r, v_1, ..., v_k)` with 256-bit randomness `r`; the decommitment
//! `D = [r, v_1, ..., v_k]` is revealed in a later round and re-hashed by
//! the verifier.

use crate::common::hash::sha512_256i;
use crate::common::random::get_random_int;
use num_bigint_dig::BigInt;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

const COMMITMENT_RANDOMNESS_BITS: usize = 256;

pub type HashCommitment = BigInt;
pub type HashDecommitment = Vec<BigInt>;

/// A binding/hiding hash commitment with its opening.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashCommitDecommit {
    #[serde(with = "crate::serde_support::bigint_bytes")]
    pub c: HashCommitment,
    #[serde(with = "crate::serde_support::vec_bigint_bytes")]
    pub d: HashDecommitment,
}

impl HashCommitDecommit {
    /// Commits to `secrets` with the supplied randomness.
    pub fn new_with_randomness(r: BigInt, secrets: &[&BigInt]) -> Self {
        let mut parts: Vec<&BigInt> = Vec::with_capacity(secrets.len() + 1);
        parts.push(&r);
        parts.extend_from_slice(secrets);
        let c = sha512_256i(&parts).expect("commitment input is never empty");

        let mut d = Vec::with_capacity(parts.len());
        d.push(r);
        d.extend(secrets.iter().map(|s| (*s).clone()));
        HashCommitDecommit { c, d }
    }

    /// Commits to `secrets` with fresh 256-bit randomness.
    pub fn new<R: CryptoRng + RngCore>(rng: &mut R, secrets: &[&BigInt]) -> Option<Self> {
        let r = get_random_int(rng, COMMITMENT_RANDOMNESS_BITS).ok()?;
        Some(Self::new_with_randomness(r, secrets))
    }

    /// Whether `c` matches the hash of `d`.
    pub fn verify(&self) -> bool {
        if self.d.is_empty() {
            return false;
        }
        let d_refs: Vec<&BigInt> = self.d.iter().collect();
        match sha512_256i(&d_refs) {
            Some(hash) => hash == self.c,
            None => false,
        }
    }

    /// Verifies the opening and returns the committed values (the opening
    /// without its randomness prefix).
    pub fn decommit(&self) -> Option<Vec<BigInt>> {
        if !self.verify() {
            return None;
        }
        Some(self.d.iter().skip(1).cloned().collect())
    }
}
