// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Sophie Germain safe-prime generation.
//!
//! A pair `(q, p)` with `p = 2q + 1` and both prime. Candidates are drawn
//! as random primes `q`, then `p` passes a small-prime sieve before the
//! Miller-Rabin rounds. Algorithm after "Safe Prime Generation with a
//! Combined Sieve" (https://eprint.iacr.org/2003/186.pdf), as in the
//! upstream Go generator.

use num_bigint_dig::prime::probably_prime;
use num_bigint_dig::{BigInt, BigUint, RandPrime, Sign};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use once_cell::sync::Lazy;
use rand::{CryptoRng, Rng, RngCore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Miller-Rabin rounds applied to the safe prime `p = 2q + 1`.
pub const PRIME_TEST_ROUNDS: usize = 64;

const MIN_SAFE_PRIME_BITS: usize = 6;

static SMALL_PRIMES: [u64; 15] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

static SMALL_PRIMES_PRODUCT: Lazy<BigInt> = Lazy::new(|| {
    SMALL_PRIMES
        .iter()
        .fold(BigInt::one(), |acc, &p| acc * BigInt::from(p))
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SafePrimeError {
    #[error("safe prime size must be at least {MIN_SAFE_PRIME_BITS} bits, got {0}")]
    BitLenTooSmall(usize),
    #[error("number of primes must be greater than 0")]
    NumPrimesInvalid,
    #[error("concurrency must be greater than 0")]
    ConcurrencyInvalid,
    #[error("safe prime generation cancelled before enough primes were found")]
    Cancelled,
    #[error("safe prime generation failed: {0}")]
    Internal(String),
}

/// A Sophie Germain prime `q` together with its safe prime `p = 2q + 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GermainSafePrime {
    q: BigInt,
    p: BigInt,
}

impl GermainSafePrime {
    /// The Sophie Germain prime `q`.
    pub fn prime(&self) -> &BigInt {
        &self.q
    }

    /// The safe prime `p = 2q + 1`.
    pub fn safe_prime(&self) -> &BigInt {
        &self.p
    }

    /// Re-checks primality of both halves and the `p = 2q + 1` relation.
    pub fn validate(&self) -> bool {
        self.p == &self.q * BigInt::from(2u8) + BigInt::one()
            && is_probably_prime(&self.q, PRIME_TEST_ROUNDS)
            && is_probably_prime(&self.p, PRIME_TEST_ROUNDS)
    }
}

impl zeroize::Zeroize for GermainSafePrime {
    fn zeroize(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.q);
        zeroize::Zeroize::zeroize(&mut self.p);
    }
}

fn is_probably_prime(n: &BigInt, rounds: usize) -> bool {
    if n.sign() != Sign::Plus {
        return false;
    }
    let n: BigUint = n.to_biguint().expect("positive by check above");
    probably_prime(&n, rounds)
}

fn is_coprime_to_small_primes(n: &BigInt) -> bool {
    let n_mod = n.mod_floor(&SMALL_PRIMES_PRODUCT);
    if n_mod.is_zero() {
        return false;
    }
    match n_mod.to_u64() {
        Some(small) => SMALL_PRIMES.iter().all(|&p| small % p != 0 || small == p),
        // Residue exceeds u64: fall back to per-prime reductions.
        None => SMALL_PRIMES
            .iter()
            .all(|&p| !n.mod_floor(&BigInt::from(p)).is_zero()),
    }
}

/// One attempt: draw a random `(p_bit_len - 1)`-bit prime `q` and test
/// `p = 2q + 1`.
fn try_safe_prime<R: CryptoRng + RngCore + Rng>(
    rng: &mut R,
    p_bit_len: usize,
) -> Option<GermainSafePrime> {
    let q: BigUint = rng.gen_prime(p_bit_len - 1);
    let q = BigInt::from_biguint(Sign::Plus, q);
    let p = &q * BigInt::from(2u8) + BigInt::one();

    if !is_coprime_to_small_primes(&p) {
        return None;
    }
    if !is_probably_prime(&p, PRIME_TEST_ROUNDS) {
        return None;
    }
    Some(GermainSafePrime { q, p })
}

/// Searches until a safe prime of exactly `p_bit_len` bits is found.
pub fn get_safe_random_prime<R: CryptoRng + RngCore + Rng>(
    rng: &mut R,
    p_bit_len: usize,
) -> Result<GermainSafePrime, SafePrimeError> {
    if p_bit_len < MIN_SAFE_PRIME_BITS {
        return Err(SafePrimeError::BitLenTooSmall(p_bit_len));
    }
    loop {
        if let Some(pair) = try_safe_prime(rng, p_bit_len) {
            debug_assert_eq!(pair.p.bits(), p_bit_len);
            return Ok(pair);
        }
    }
}

/// Generates `num_primes` distinct safe primes on a pool of `concurrency`
/// worker threads, stopping the search through a shared cancellation flag
/// once enough primes arrived or the deadline passed.
pub fn get_random_safe_primes(
    p_bit_len: usize,
    num_primes: usize,
    concurrency: usize,
    timeout: Option<Duration>,
) -> Result<Vec<GermainSafePrime>, SafePrimeError> {
    if p_bit_len < MIN_SAFE_PRIME_BITS {
        return Err(SafePrimeError::BitLenTooSmall(p_bit_len));
    }
    if num_primes == 0 {
        return Err(SafePrimeError::NumPrimesInvalid);
    }
    if concurrency == 0 {
        return Err(SafePrimeError::ConcurrencyInvalid);
    }

    let (tx, rx) = mpsc::channel::<GermainSafePrime>();
    let stop = Arc::new(AtomicBool::new(false));

    for _ in 0..concurrency {
        let tx = tx.clone();
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut rng = rand::thread_rng();
            while !stop.load(Ordering::Relaxed) {
                if let Some(pair) = try_safe_prime(&mut rng, p_bit_len) {
                    if tx.send(pair).is_err() {
                        break;
                    }
                }
            }
        });
    }
    drop(tx);

    let started = Instant::now();
    let mut found: Vec<GermainSafePrime> = Vec::with_capacity(num_primes);
    while found.len() < num_primes {
        let remaining = match timeout {
            Some(t) => match t.checked_sub(started.elapsed()) {
                Some(r) => r,
                None => {
                    stop.store(true, Ordering::Relaxed);
                    return Err(SafePrimeError::Cancelled);
                }
            },
            None => Duration::from_secs(3600),
        };
        match rx.recv_timeout(remaining) {
            Ok(pair) => {
                // The same prime arriving twice (or a Paillier modulus with
                // p == q) must not slip through.
                if !found.iter().any(|f| f.p == pair.p) {
                    found.push(pair);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                if timeout.is_some() {
                    stop.store(true, Ordering::Relaxed);
                    return Err(SafePrimeError::Cancelled);
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                stop.store(true, Ordering::Relaxed);
                return Err(SafePrimeError::Internal(
                    "all workers exited before enough primes were found".into(),
                ));
            }
        }
    }
    stop.store(true, Ordering::Relaxed);
    log::debug!(
        "generated {} safe prime(s) of {} bits in {:?}",
        num_primes,
        p_bit_len,
        started.elapsed()
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn validate_known_pairs() {
        let good = GermainSafePrime {
            q: BigInt::from(11u8),
            p: BigInt::from(23u8),
        };
        assert!(good.validate());

        // q not prime
        let bad_q = GermainSafePrime {
            q: BigInt::from(10u8),
            p: BigInt::from(21u8),
        };
        assert!(!bad_q.validate());

        // p != 2q + 1
        let bad_rel = GermainSafePrime {
            q: BigInt::from(11u8),
            p: BigInt::from(29u8),
        };
        assert!(!bad_rel.validate());

        // q prime but p composite
        let bad_p = GermainSafePrime {
            q: BigInt::from(7u8),
            p: BigInt::from(15u8),
        };
        assert!(!bad_p.validate());
    }

    #[test]
    fn small_prime_sieve() {
        assert!(is_coprime_to_small_primes(&BigInt::from(59u8)));
        assert!(!is_coprime_to_small_primes(&BigInt::from(15u8)));
        assert!(!is_coprime_to_small_primes(
            &(SMALL_PRIMES_PRODUCT.clone() * BigInt::from(2u8))
        ));
    }

    #[test]
    fn generate_single() {
        let mut rng = StdRng::seed_from_u64(11);
        let pair = get_safe_random_prime(&mut rng, 64).unwrap();
        assert!(pair.validate());
        assert_eq!(pair.safe_prime().bits(), 64);
        assert_eq!(pair.prime().bits(), 63);
    }

    #[test]
    fn generate_concurrent() {
        let primes =
            get_random_safe_primes(48, 2, 2, Some(Duration::from_secs(60))).unwrap();
        assert_eq!(primes.len(), 2);
        assert_ne!(primes[0].p, primes[1].p);
        for pair in &primes {
            assert!(pair.validate());
        }
    }

    #[test]
    fn rejects_invalid_arguments() {
        assert!(matches!(
            get_random_safe_primes(4, 1, 1, None),
            Err(SafePrimeError::BitLenTooSmall(4))
        ));
        assert!(matches!(
            get_random_safe_primes(32, 0, 1, None),
            Err(SafePrimeError::NumPrimesInvalid)
        ));
        assert!(matches!(
            get_random_safe_primes(32, 1, 0, None),
            Err(SafePrimeError::ConcurrencyInvalid)
        ));
    }

    #[test]
    fn times_out() {
        // 512-bit safe primes will not appear within a millisecond.
        let result = get_random_safe_primes(512, 1, 1, Some(Duration::from_millis(1)));
        assert!(matches!(result, Err(SafePrimeError::Cancelled)));
    }
}
