// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Schnorr proof of knowledge of a discrete logarithm over secp256k1.
//!
//! Non-interactive via Fiat-Shamir: `alpha = a*G`,
//! `c = H(X, G, alpha) mod q`, `t = a + c*x mod q`; the verifier checks
//! `t*G == alpha + c*X`.

use crate::common::hash::{rejection_sample, sha512_256i};
use crate::common::int::ModInt;
use crate::common::random::get_random_int_from_zn;
use crate::crypto::ecpoint::{curve_n, EcPoint};
use num_bigint_dig::BigInt;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchnorrError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("rng returned no bytes")]
    Rng,
}

/// Proof of knowledge of `x` with `X = x*G`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlogProof {
    pub alpha: EcPoint,
    #[serde(with = "crate::serde_support::bigint_bytes")]
    pub t: BigInt,
}

impl DlogProof {
    pub fn new<R: CryptoRng + RngCore>(
        x: &BigInt,
        x_pub: &EcPoint,
        rng: &mut R,
    ) -> Result<Self, SchnorrError> {
        if x_pub.is_identity() {
            return Err(SchnorrError::InvalidParameters(
                "public point is the identity".into(),
            ));
        }
        let q = curve_n();
        let mod_q = ModInt::new(q.clone());

        let a = get_random_int_from_zn(rng, q).map_err(|_| SchnorrError::Rng)?;
        let alpha = EcPoint::scalar_base_mult(&a);
        let c = challenge(x_pub, &alpha);
        let t = mod_q.add(&a, &mod_q.mul(&c, x));
        Ok(DlogProof { alpha, t })
    }

    pub fn verify(&self, x_pub: &EcPoint) -> bool {
        if x_pub.is_identity() || self.alpha.is_identity() {
            return false;
        }
        let c = challenge(x_pub, &self.alpha);
        let lhs = EcPoint::scalar_base_mult(&self.t);
        let rhs = self.alpha.add(&x_pub.scalar_mul(&c));
        lhs == rhs
    }
}

fn challenge(x_pub: &EcPoint, alpha: &EcPoint) -> BigInt {
    let (xx, xy) = x_pub.coords();
    let (gx, gy) = EcPoint::generator().coords();
    let (ax, ay) = alpha.coords();
    let hash = sha512_256i(&[&xx, &xy, &gx, &gy, &ax, &ay])
        .expect("challenge input is never empty");
    rejection_sample(curve_n(), &hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn prove_and_verify() {
        let mut rng = StdRng::seed_from_u64(21);
        let x = get_random_int_from_zn(&mut rng, curve_n()).unwrap();
        let x_pub = EcPoint::scalar_base_mult(&x);

        let proof = DlogProof::new(&x, &x_pub, &mut rng).unwrap();
        assert!(proof.verify(&x_pub));
    }

    #[test]
    fn wrong_statement_fails() {
        let mut rng = StdRng::seed_from_u64(22);
        let x = get_random_int_from_zn(&mut rng, curve_n()).unwrap();
        let x_pub = EcPoint::scalar_base_mult(&x);
        let proof = DlogProof::new(&x, &x_pub, &mut rng).unwrap();

        let other = EcPoint::scalar_base_mult(&(x + BigInt::one()));
        assert!(!proof.verify(&other));
    }

    #[test]
    fn tampered_proof_fails() {
        let mut rng = StdRng::seed_from_u64(23);
        let x = get_random_int_from_zn(&mut rng, curve_n()).unwrap();
        let x_pub = EcPoint::scalar_base_mult(&x);
        let proof = DlogProof::new(&x, &x_pub, &mut rng).unwrap();

        let mut bad_t = proof.clone();
        bad_t.t += BigInt::one();
        assert!(!bad_t.verify(&x_pub));

        let mut bad_alpha = proof;
        bad_alpha.alpha = bad_alpha.alpha.add(&EcPoint::generator());
        assert!(!bad_alpha.verify(&x_pub));
    }
}
