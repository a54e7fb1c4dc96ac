// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Uniform sampling of big integers from a caller-supplied CSPRNG.
//!
//! Every function reports RNG exhaustion instead of panicking; protocol
//! code maps the `None`/`Err` into its fatal `RngFailure` kind.

use num_bigint_dig::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use thiserror::Error;

const MAX_RANDOM_INT_BITS: usize = 5000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RandomError {
    #[error("bits must be in 1..={MAX_RANDOM_INT_BITS}, got {0}")]
    BitsOutOfRange(usize),
    #[error("upper bound must be positive")]
    BoundNotPositive,
    #[error("rng returned no bytes: {0}")]
    RngFailure(String),
}

/// A uniform integer in `[0, 2^bits - 1]`.
pub fn get_random_int<R: CryptoRng + RngCore>(
    rng: &mut R,
    bits: usize,
) -> Result<BigInt, RandomError> {
    if bits == 0 || bits > MAX_RANDOM_INT_BITS {
        return Err(RandomError::BitsOutOfRange(bits));
    }
    let mut buf = vec![0u8; (bits + 7) / 8];
    rng.try_fill_bytes(&mut buf)
        .map_err(|e| RandomError::RngFailure(e.to_string()))?;
    // Mask the excess high bits so the draw stays below 2^bits.
    let excess = buf.len() * 8 - bits;
    buf[0] &= 0xffu8 >> excess;
    Ok(BigInt::from_bytes_be(Sign::Plus, &buf))
}

/// A uniform integer in `[0, n)` by rejection sampling at `n`'s bit length.
pub fn get_random_int_from_zn<R: CryptoRng + RngCore>(
    rng: &mut R,
    n: &BigInt,
) -> Result<BigInt, RandomError> {
    if n.sign() != Sign::Plus {
        return Err(RandomError::BoundNotPositive);
    }
    loop {
        let draw = get_random_int(rng, n.bits())?;
        if &draw < n {
            return Ok(draw);
        }
    }
}

/// A uniform element of the multiplicative group `(Z/nZ)*`, i.e. an integer
/// in `[1, n)` with `gcd(draw, n) = 1`.
pub fn get_random_int_from_zn_star<R: CryptoRng + RngCore>(
    rng: &mut R,
    n: &BigInt,
) -> Result<BigInt, RandomError> {
    if n.sign() != Sign::Plus {
        return Err(RandomError::BoundNotPositive);
    }
    loop {
        let draw = get_random_int_from_zn(rng, n)?;
        if !draw.is_zero() && draw.gcd(n).is_one() {
            return Ok(draw);
        }
    }
}

/// `0 < v < n` and `gcd(v, n) = 1`.
pub fn is_number_in_multiplicative_group(n: &BigInt, v: &BigInt) -> bool {
    n.sign() == Sign::Plus && v.sign() == Sign::Plus && v < n && v.gcd(n).is_one()
}

/// A random generator of the quadratic residues modulo `n`: `f^2 mod n` for
/// uniform `f` in `(Z/nZ)*`. Generates the full residue group when `n` is a
/// product of two distinct safe primes.
pub fn get_random_quadratic_residue_generator<R: CryptoRng + RngCore>(
    rng: &mut R,
    n: &BigInt,
) -> Result<BigInt, RandomError> {
    let f = get_random_int_from_zn_star(rng, n)?;
    Ok(f.modpow(&BigInt::from(2u8), n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn random_int_respects_bit_length() {
        let mut rng = rng();
        for bits in [1usize, 7, 8, 65, 256] {
            let v = get_random_int(&mut rng, bits).unwrap();
            assert!(v.bits() <= bits, "bits={} got {}", bits, v.bits());
            assert!(v.sign() != Sign::Minus);
        }
        assert!(get_random_int(&mut rng, 0).is_err());
        assert!(get_random_int(&mut rng, MAX_RANDOM_INT_BITS + 1).is_err());
    }

    #[test]
    fn zn_sampling_stays_in_range() {
        let mut rng = rng();
        let n = BigInt::from(10_000u16);
        for _ in 0..64 {
            let v = get_random_int_from_zn(&mut rng, &n).unwrap();
            assert!(v >= BigInt::zero() && v < n);
        }
        assert!(get_random_int_from_zn(&mut rng, &BigInt::zero()).is_err());
        assert!(get_random_int_from_zn(&mut rng, &BigInt::from(-3i8)).is_err());
    }

    #[test]
    fn zn_star_sampling_is_coprime() {
        let mut rng = rng();
        let n = BigInt::from(100u8);
        for _ in 0..32 {
            let v = get_random_int_from_zn_star(&mut rng, &n).unwrap();
            assert!(is_number_in_multiplicative_group(&n, &v));
        }
    }

    #[test]
    fn multiplicative_group_membership() {
        let n = BigInt::from(10u8);
        assert!(is_number_in_multiplicative_group(&n, &BigInt::from(3u8)));
        assert!(is_number_in_multiplicative_group(&n, &BigInt::from(7u8)));
        assert!(!is_number_in_multiplicative_group(&n, &BigInt::from(2u8)));
        assert!(!is_number_in_multiplicative_group(&n, &BigInt::from(5u8)));
        assert!(!is_number_in_multiplicative_group(&n, &BigInt::zero()));
        assert!(!is_number_in_multiplicative_group(&n, &n));
        assert!(!is_number_in_multiplicative_group(&BigInt::zero(), &BigInt::one()));
    }

    /// An rng whose entropy source is exhausted.
    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, _dest: &mut [u8]) {}
        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("no entropy"))
        }
    }

    impl CryptoRng for FailingRng {}

    #[test]
    fn rng_failure_is_reported() {
        let mut rng = FailingRng;
        assert!(matches!(
            get_random_int(&mut rng, 64),
            Err(RandomError::RngFailure(_))
        ));
        assert!(matches!(
            get_random_int_from_zn(&mut rng, &BigInt::from(100u8)),
            Err(RandomError::RngFailure(_))
        ));
    }

    #[test]
    fn quadratic_residue_generator() {
        let mut rng = rng();
        // n = 7 * 11
        let n = BigInt::from(77u8);
        let g = get_random_quadratic_residue_generator(&mut rng, &n).unwrap();
        assert!(g > BigInt::zero() && g < n);
        // A square has a square root by construction; spot-check coprimality.
        assert!(g.gcd(&n).is_one());
    }
}
