// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Zero-knowledge proof of discrete-log knowledge over a safe-prime
//! product (DLN proof).
//!
//! Proves knowledge of `x` with `h2 = h1^x mod N~` where
//! `N~ = (2p'+1)(2q'+1)` for Sophie Germain primes `p'`, `q'`. Binary
//! challenges over [`ITERATIONS`] parallel iterations; exponents live in
//! `Z_(p'q')`.

use crate::common::hash::sha512_256i;
use crate::common::int::ModInt;
use crate::common::random::get_random_int_from_zn;
use num_bigint_dig::{BigInt, Sign};
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of parallel iterations; the soundness error is `2^-ITERATIONS`.
pub const ITERATIONS: usize = 128;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DlnError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("rng returned no bytes")]
    Rng,
}

/// The proof transcript `(alpha_i, t_i)` for each iteration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlnProof {
    #[serde(with = "crate::serde_support::vec_bigint_bytes")]
    pub alpha: Vec<BigInt>,
    #[serde(with = "crate::serde_support::vec_bigint_bytes")]
    pub t: Vec<BigInt>,
}

impl DlnProof {
    /// Proves `h2 = h1^x mod n`. `p` and `q` are the Sophie Germain primes
    /// underlying the factors of `n`; random exponents are drawn mod `p*q`.
    pub fn new<R: CryptoRng + RngCore>(
        h1: &BigInt,
        h2: &BigInt,
        x: &BigInt,
        p: &BigInt,
        q: &BigInt,
        n: &BigInt,
        rng: &mut R,
    ) -> Result<Self, DlnError> {
        if h1.sign() != Sign::Plus
            || h2.sign() != Sign::Plus
            || p.sign() != Sign::Plus
            || q.sign() != Sign::Plus
            || n.sign() != Sign::Plus
            || x.sign() == Sign::Minus
        {
            return Err(DlnError::InvalidParameters(
                "all inputs must be positive".into(),
            ));
        }

        let p_mul_q = p * q;
        let mod_n = ModInt::new(n.clone());
        let mod_pq = ModInt::new(p_mul_q.clone());

        let mut a_vals = Vec::with_capacity(ITERATIONS);
        let mut alpha = Vec::with_capacity(ITERATIONS);
        for _ in 0..ITERATIONS {
            let a_i = get_random_int_from_zn(rng, &p_mul_q).map_err(|_| DlnError::Rng)?;
            alpha.push(mod_n.exp(h1, &a_i));
            a_vals.push(a_i);
        }

        let c = challenge(h1, h2, n, &alpha);
        let one = BigInt::one();
        let mut t = Vec::with_capacity(ITERATIONS);
        for (i, a_i) in a_vals.iter().enumerate() {
            let c_i = (&c >> i) & &one;
            t.push(mod_pq.add(a_i, &mod_pq.mul(&c_i, x)));
        }
        Ok(DlnProof { alpha, t })
    }

    pub fn verify(&self, h1: &BigInt, h2: &BigInt, n: &BigInt) -> bool {
        if self.alpha.len() != ITERATIONS || self.t.len() != ITERATIONS {
            return false;
        }
        if n.sign() != Sign::Plus {
            return false;
        }
        let mod_n = ModInt::new(n.clone());
        let one = BigInt::one();

        let h1_mod = mod_n.add(h1, &BigInt::zero());
        let h2_mod = mod_n.add(h2, &BigInt::zero());
        if h1_mod <= one || h2_mod <= one || h1_mod == h2_mod {
            return false;
        }
        for alpha_i in &self.alpha {
            if alpha_i.is_zero() || alpha_i >= n {
                return false;
            }
        }
        for t_i in &self.t {
            if t_i.sign() == Sign::Minus || t_i >= n {
                return false;
            }
        }

        let c = challenge(h1, h2, n, &self.alpha);
        for i in 0..ITERATIONS {
            let c_i = (&c >> i) & &one;
            // h1^t_i == alpha_i * h2^c_i mod n
            let lhs = mod_n.exp(h1, &self.t[i]);
            let rhs = mod_n.mul(&self.alpha[i], &mod_n.exp(h2, &c_i));
            if lhs != rhs {
                return false;
            }
        }
        true
    }
}

fn challenge(h1: &BigInt, h2: &BigInt, n: &BigInt, alpha: &[BigInt]) -> BigInt {
    let mut inputs: Vec<&BigInt> = Vec::with_capacity(3 + alpha.len());
    inputs.push(h1);
    inputs.push(h2);
    inputs.push(n);
    inputs.extend(alpha.iter());
    sha512_256i(&inputs).expect("challenge input is never empty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::random::get_random_int_from_zn_star;
    use crate::common::safe_prime::get_safe_random_prime;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Setup {
        n: BigInt,
        p: BigInt,
        q: BigInt,
        h1: BigInt,
        h2: BigInt,
        x: BigInt,
    }

    fn setup(rng: &mut StdRng) -> Setup {
        let sp1 = get_safe_random_prime(rng, 64).unwrap();
        let sp2 = get_safe_random_prime(rng, 64).unwrap();
        let n = sp1.safe_prime() * sp2.safe_prime();
        let p = sp1.prime().clone();
        let q = sp2.prime().clone();
        let pq = &p * &q;

        let f = get_random_int_from_zn_star(rng, &n).unwrap();
        let h1 = f.modpow(&BigInt::from(2u8), &n);
        let x = get_random_int_from_zn_star(rng, &pq).unwrap();
        let h2 = h1.modpow(&x, &n);
        Setup { n, p, q, h1, h2, x }
    }

    #[test]
    fn prove_and_verify() {
        let mut rng = StdRng::seed_from_u64(31);
        let s = setup(&mut rng);

        let proof =
            DlnProof::new(&s.h1, &s.h2, &s.x, &s.p, &s.q, &s.n, &mut rng).unwrap();
        assert_eq!(proof.alpha.len(), ITERATIONS);
        assert_eq!(proof.t.len(), ITERATIONS);
        assert!(proof.verify(&s.h1, &s.h2, &s.n));

        // The inverse exponent proves the reverse direction.
        let pq = &s.p * &s.q;
        let x_inv = ModInt::new(pq.clone()).mod_inverse(&s.x).unwrap();
        let reverse =
            DlnProof::new(&s.h2, &s.h1, &x_inv, &s.p, &s.q, &s.n, &mut rng).unwrap();
        assert!(reverse.verify(&s.h2, &s.h1, &s.n));
    }

    #[test]
    fn wrong_inputs_fail() {
        let mut rng = StdRng::seed_from_u64(32);
        let s = setup(&mut rng);
        let proof =
            DlnProof::new(&s.h1, &s.h2, &s.x, &s.p, &s.q, &s.n, &mut rng).unwrap();

        assert!(!proof.verify(&(&s.h1 + BigInt::one()), &s.h2, &s.n));
        assert!(!proof.verify(&s.h1, &(&s.h2 + BigInt::one()), &s.n));
        assert!(!proof.verify(&s.h1, &s.h2, &(&s.n + BigInt::one())));
        // h1 == h2 is rejected outright.
        assert!(!proof.verify(&s.h1, &s.h1, &s.n));
    }

    #[test]
    fn tampered_transcript_fails() {
        let mut rng = StdRng::seed_from_u64(33);
        let s = setup(&mut rng);
        let proof =
            DlnProof::new(&s.h1, &s.h2, &s.x, &s.p, &s.q, &s.n, &mut rng).unwrap();

        let mut bad_alpha = proof.clone();
        bad_alpha.alpha[0] = (&bad_alpha.alpha[0] + BigInt::one()) % &s.n;
        assert!(!bad_alpha.verify(&s.h1, &s.h2, &s.n));

        let mut bad_t = proof.clone();
        bad_t.t[7] = (&bad_t.t[7] + BigInt::one()) % &s.n;
        assert!(!bad_t.verify(&s.h1, &s.h2, &s.n));

        let mut truncated = proof;
        truncated.alpha.pop();
        assert!(!truncated.verify(&s.h1, &s.h2, &s.n));
    }
}
