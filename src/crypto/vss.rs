// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Feldman verifiable secret sharing over secp256k1.
//!
//! A secret `u` is shared through a random polynomial `P` of degree `t - 1`
//! with `P(0) = u`. The point commitments `A_k = coeffs[k] * G` let every
//! receiver check its share against the dealer's broadcast.

use crate::common::int::ModInt;
use crate::crypto::ecpoint::{curve_n, EcPoint};
use num_bigint_dig::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::common::random::get_random_int_from_zn;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VssError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("id is 0 or 0 modulo the order of the curve")]
    ShareIdZero,
    #[error("lagrange denominator is not invertible (coincident share ids)")]
    InverseFail,
    #[error("rng returned no bytes")]
    Rng,
}

/// Dealer-side polynomial; `coeffs[0]` is the shared secret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial {
    coeffs: Vec<BigInt>,
}

/// Broadcast point commitments `A_k = coeffs[k] * G`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolynomialCommitment {
    pub points: Vec<EcPoint>,
}

/// One party's share `(id, P(id))`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    #[serde(with = "crate::serde_support::bigint_bytes")]
    pub id: BigInt,
    #[serde(with = "crate::serde_support::bigint_bytes")]
    pub share: BigInt,
}

/// Samples a sharing polynomial with `threshold` coefficients and its point
/// commitment vector.
pub fn init<R: CryptoRng + RngCore>(
    secret: &BigInt,
    threshold: usize,
    rng: &mut R,
) -> Result<(Polynomial, PolynomialCommitment), VssError> {
    if threshold < 1 {
        return Err(VssError::InvalidParameters(
            "threshold must be at least 1".into(),
        ));
    }
    let q = curve_n();
    let mut coeffs = Vec::with_capacity(threshold);
    coeffs.push(secret.mod_floor(q));
    for _ in 1..threshold {
        coeffs.push(get_random_int_from_zn(rng, q).map_err(|_| VssError::Rng)?);
    }
    let points = coeffs.iter().map(|c| EcPoint::scalar_base_mult(c)).collect();
    Ok((Polynomial { coeffs }, PolynomialCommitment { points }))
}

impl Polynomial {
    /// Number of coefficients (the sharing threshold `t`).
    pub fn threshold(&self) -> usize {
        self.coeffs.len()
    }

    pub fn secret(&self) -> &BigInt {
        &self.coeffs[0]
    }

    /// Horner evaluation of `P(id) mod q`, from the highest coefficient
    /// down. Ids congruent to zero are rejected.
    pub fn evaluate(&self, id: &BigInt) -> Result<BigInt, VssError> {
        let q = curve_n();
        if id.mod_floor(q).is_zero() {
            return Err(VssError::ShareIdZero);
        }
        let mut result = self.coeffs[self.coeffs.len() - 1].clone();
        for coeff in self.coeffs.iter().rev().skip(1) {
            result = (result * id + coeff).mod_floor(q);
        }
        Ok(result)
    }

    /// Shares for every evaluation point in `ids`.
    pub fn shares(&self, ids: &[BigInt]) -> Result<Vec<Share>, VssError> {
        ids.iter()
            .map(|id| {
                Ok(Share {
                    id: id.clone(),
                    share: self.evaluate(id)?,
                })
            })
            .collect()
    }
}

impl Zeroize for Polynomial {
    fn zeroize(&mut self) {
        for c in &mut self.coeffs {
            c.zeroize();
        }
        self.coeffs.clear();
    }
}

impl PolynomialCommitment {
    pub fn threshold(&self) -> usize {
        self.points.len()
    }

    /// The curve point the committed polynomial takes at `id`:
    /// `A_0 + id * A_1 + ... + id^(t-1) * A_(t-1)`.
    ///
    /// Accumulates powers of `id` mod q, starting from `A_0`.
    pub fn evaluate(&self, id: &BigInt) -> EcPoint {
        let mod_q = ModInt::new(curve_n().clone());
        let mut acc = self.points[0];
        let mut id_pow = id.mod_floor(curve_n());
        for point in self.points.iter().skip(1) {
            acc = acc.add(&point.scalar_mul(&id_pow));
            id_pow = mod_q.mul(&id_pow, id);
        }
        acc
    }
}

impl Share {
    /// Checks `share * G == sum_k id^k * A_k` in the group.
    pub fn verify(&self, poly_g: &PolynomialCommitment) -> bool {
        if poly_g.points.is_empty() || self.id.mod_floor(curve_n()).is_zero() {
            return false;
        }
        EcPoint::scalar_base_mult(&self.share) == poly_g.evaluate(&self.id)
    }
}

/// Recovers the secret `P(0)` from the given shares by Lagrange
/// interpolation modulo the curve order.
pub fn combine(shares: &[Share]) -> Result<BigInt, VssError> {
    if shares.is_empty() {
        return Err(VssError::InvalidParameters("no shares supplied".into()));
    }
    let mod_q = ModInt::new(curve_n().clone());
    let mut secret = BigInt::zero();

    for (i, share_i) in shares.iter().enumerate() {
        let mut basis = BigInt::one();
        for (j, share_j) in shares.iter().enumerate() {
            if i == j {
                continue;
            }
            let denominator = mod_q.sub(&share_j.id, &share_i.id);
            if denominator.is_zero() {
                return Err(VssError::InverseFail);
            }
            let inv = mod_q.mod_inverse(&denominator).ok_or(VssError::InverseFail)?;
            basis = mod_q.mul(&basis, &mod_q.mul(&share_j.id, &inv));
        }
        secret = mod_q.add(&secret, &mod_q.mul(&share_i.share, &basis));
    }
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    #[test]
    fn shares_verify_and_combine() {
        let mut rng = rng();
        let secret = BigInt::from(123_456_789_012_345u64);
        let threshold = 3;
        let ids: Vec<BigInt> = (1u8..=5).map(BigInt::from).collect();

        let (poly, poly_g) = init(&secret, threshold, &mut rng).unwrap();
        assert_eq!(poly_g.threshold(), threshold);

        let shares = poly.shares(&ids).unwrap();
        for share in &shares {
            assert!(share.verify(&poly_g));
        }

        // Exactly t shares.
        assert_eq!(combine(&shares[0..threshold]).unwrap(), secret);
        // A different subset.
        assert_eq!(combine(&shares[2..5]).unwrap(), secret);
        // More than t shares still interpolates exactly.
        assert_eq!(combine(&shares).unwrap(), secret);
    }

    #[test]
    fn horner_matches_power_sum() {
        let mut rng = rng();
        let (poly, _) = init(&BigInt::from(42u8), 4, &mut rng).unwrap();
        let id = BigInt::from(7u8);

        let mod_q = ModInt::new(curve_n().clone());
        let mut expected = BigInt::zero();
        let mut id_pow = BigInt::one();
        for k in 0..poly.threshold() {
            expected = mod_q.add(&expected, &mod_q.mul(&poly.coeffs[k], &id_pow));
            id_pow = mod_q.mul(&id_pow, &id);
        }
        assert_eq!(poly.evaluate(&id).unwrap(), expected);
    }

    #[test]
    fn zero_id_is_rejected() {
        let mut rng = rng();
        let (poly, _) = init(&BigInt::from(5u8), 2, &mut rng).unwrap();
        assert_eq!(poly.evaluate(&BigInt::zero()), Err(VssError::ShareIdZero));
        // 0 modulo the curve order is just as invalid.
        assert_eq!(poly.evaluate(curve_n()), Err(VssError::ShareIdZero));
        assert!(poly.shares(&[BigInt::zero()]).is_err());
    }

    #[test]
    fn tampered_share_fails_verification() {
        let mut rng = rng();
        let ids = vec![BigInt::from(1u8), BigInt::from(2u8)];
        let (poly, poly_g) = init(&BigInt::from(999u16), 2, &mut rng).unwrap();
        let mut shares = poly.shares(&ids).unwrap();

        shares[0].share += BigInt::one();
        assert!(!shares[0].verify(&poly_g));
        assert!(shares[1].verify(&poly_g));
    }

    #[test]
    fn share_does_not_verify_against_foreign_commitment() {
        let mut rng = rng();
        let ids = vec![BigInt::from(1u8), BigInt::from(2u8)];
        let (poly1, poly_g1) = init(&BigInt::from(888u16), 2, &mut rng).unwrap();
        let (_, poly_g2) = init(&BigInt::from(777u16), 2, &mut rng).unwrap();

        let shares = poly1.shares(&ids).unwrap();
        assert!(!shares[0].verify(&poly_g2));
        assert!(shares[0].verify(&poly_g1));
    }

    #[test]
    fn coincident_ids_fail_with_inverse_error() {
        let mut rng = rng();
        let (poly, _) = init(&BigInt::from(31337u16), 2, &mut rng).unwrap();
        let id = BigInt::from(9u8);
        let share = poly.evaluate(&id).unwrap();
        let shares = vec![
            Share {
                id: id.clone(),
                share: share.clone(),
            },
            Share { id, share },
        ];
        assert_eq!(combine(&shares), Err(VssError::InverseFail));

        // Ids that only collide modulo the curve order also fail.
        let id_a = BigInt::from(3u8);
        let id_b = curve_n() + BigInt::from(3u8);
        let shares = vec![
            Share {
                id: id_a.clone(),
                share: poly.evaluate(&id_a).unwrap(),
            },
            Share {
                id: id_b.clone(),
                share: poly.evaluate(&id_b).unwrap(),
            },
        ];
        assert_eq!(combine(&shares), Err(VssError::InverseFail));
    }

    #[test]
    fn combine_of_nothing_is_an_error() {
        assert!(matches!(
            combine(&[]),
            Err(VssError::InvalidParameters(_))
        ));
    }

    #[test]
    fn polynomial_zeroizes() {
        let mut rng = rng();
        let (mut poly, _) = init(&BigInt::from(1234u16), 3, &mut rng).unwrap();
        poly.zeroize();
        assert!(poly.coeffs.is_empty());
    }
}
