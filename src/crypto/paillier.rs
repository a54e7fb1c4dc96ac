// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Paillier cryptosystem keyed from safe primes, as the signing rounds
//! downstream of keygen expect (GG18 spec section 6).
//!
//! Keygen draws two distinct safe primes of half the modulus length and
//! retries until the modulus reaches its full bit length. Encryption uses
//! `gamma = N + 1`.

use crate::common::int::ModInt;
use crate::common::random::get_random_int_from_zn_star;
use crate::common::safe_prime::{get_random_safe_primes, SafePrimeError};
use num_bigint_dig::{BigInt, Sign};
use num_integer::Integer;
use num_traits::One;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaillierError {
    #[error("message is negative or too large for the modulus")]
    MessageTooLong,
    #[error("ciphertext is malformed (not a unit modulo N^2)")]
    MessageMalformed,
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
    #[error("rng returned no bytes")]
    Rng,
}

impl From<SafePrimeError> for PaillierError {
    fn from(e: SafePrimeError) -> Self {
        PaillierError::KeyGeneration(e.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    #[serde(with = "crate::serde_support::bigint_bytes")]
    pub n: BigInt,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    pub public_key: PublicKey,
    /// Carmichael function `lambda(N) = lcm(p-1, q-1)`.
    #[serde(with = "crate::serde_support::bigint_bytes")]
    pub lambda_n: BigInt,
    /// Euler totient `phi(N) = (p-1)(q-1)`.
    #[serde(with = "crate::serde_support::bigint_bytes")]
    pub phi_n: BigInt,
    #[serde(with = "crate::serde_support::bigint_bytes")]
    pub p: BigInt,
    #[serde(with = "crate::serde_support::bigint_bytes")]
    pub q: BigInt,
}

/// Generates a Paillier keypair with a modulus of exactly
/// `modulus_bit_len` bits from two distinct safe primes.
pub fn generate_keypair(
    modulus_bit_len: usize,
    concurrency: usize,
    timeout: Option<Duration>,
) -> Result<(PrivateKey, PublicKey), PaillierError> {
    if modulus_bit_len < 16 || modulus_bit_len % 2 != 0 {
        return Err(PaillierError::KeyGeneration(format!(
            "modulus bit length {} is unusable",
            modulus_bit_len
        )));
    }
    let prime_bits = modulus_bit_len / 2;
    loop {
        let primes = get_random_safe_primes(prime_bits, 2, concurrency, timeout)?;
        let p = primes[0].safe_prime().clone();
        let q = primes[1].safe_prime().clone();
        let n = &p * &q;
        if n.bits() < modulus_bit_len {
            continue;
        }

        let p_minus_1 = &p - BigInt::one();
        let q_minus_1 = &q - BigInt::one();
        let phi_n = &p_minus_1 * &q_minus_1;
        let lambda_n = &phi_n / p_minus_1.gcd(&q_minus_1);

        let public_key = PublicKey { n };
        let private_key = PrivateKey {
            public_key: public_key.clone(),
            lambda_n,
            phi_n,
            p,
            q,
        };
        return Ok((private_key, public_key));
    }
}

impl PublicKey {
    pub fn n_square(&self) -> BigInt {
        &self.n * &self.n
    }

    /// `gamma = N + 1`, a generator of the plaintext subgroup.
    pub fn gamma(&self) -> BigInt {
        &self.n + BigInt::one()
    }

    /// Encrypts `m` and returns the ciphertext with the randomness used.
    pub fn encrypt_and_return_randomness<R: CryptoRng + RngCore>(
        &self,
        rng: &mut R,
        m: &BigInt,
    ) -> Result<(BigInt, BigInt), PaillierError> {
        if m.sign() == Sign::Minus || m >= &self.n {
            return Err(PaillierError::MessageTooLong);
        }
        let x = get_random_int_from_zn_star(rng, &self.n).map_err(|_| PaillierError::Rng)?;
        let mod_nn = ModInt::new(self.n_square());
        let gm = mod_nn.exp(&self.gamma(), m);
        let xn = mod_nn.exp(&x, &self.n);
        Ok((mod_nn.mul(&gm, &xn), x))
    }

    pub fn encrypt<R: CryptoRng + RngCore>(
        &self,
        rng: &mut R,
        m: &BigInt,
    ) -> Result<BigInt, PaillierError> {
        self.encrypt_and_return_randomness(rng, m).map(|(c, _)| c)
    }

    /// Homomorphic addition: `Enc(m1) (+) Enc(m2) = c1 * c2 mod N^2`.
    pub fn homo_add(&self, c1: &BigInt, c2: &BigInt) -> Result<BigInt, PaillierError> {
        let nn = self.n_square();
        if c1.sign() == Sign::Minus || c1 >= &nn || c2.sign() == Sign::Minus || c2 >= &nn {
            return Err(PaillierError::MessageTooLong);
        }
        Ok(ModInt::new(nn).mul(c1, c2))
    }

    /// Homomorphic scalar multiplication: `m (*) Enc(m1) = c1^m mod N^2`.
    pub fn homo_mult(&self, m: &BigInt, c1: &BigInt) -> Result<BigInt, PaillierError> {
        if m.sign() == Sign::Minus || m >= &self.n {
            return Err(PaillierError::MessageTooLong);
        }
        let nn = self.n_square();
        if c1.sign() == Sign::Minus || c1 >= &nn {
            return Err(PaillierError::MessageTooLong);
        }
        Ok(ModInt::new(nn).exp(c1, m))
    }
}

impl PrivateKey {
    /// Decrypts `c`: `m = L(c^lambda mod N^2) * mu mod N` with
    /// `L(u) = (u - 1) / N` and `mu = L(gamma^lambda mod N^2)^-1`.
    pub fn decrypt(&self, c: &BigInt) -> Result<BigInt, PaillierError> {
        let n = &self.public_key.n;
        let nn = self.public_key.n_square();
        if c.sign() != Sign::Plus || c >= &nn {
            return Err(PaillierError::MessageMalformed);
        }
        if !c.gcd(&nn).is_one() {
            return Err(PaillierError::MessageMalformed);
        }
        let mod_nn = ModInt::new(nn);

        let l = |u: &BigInt| -> BigInt { (u - BigInt::one()) / n };

        let lc = l(&mod_nn.exp(c, &self.lambda_n));
        let lg = l(&mod_nn.exp(&self.public_key.gamma(), &self.lambda_n));
        let mu = ModInt::new(n.clone())
            .mod_inverse(&lg)
            .ok_or(PaillierError::MessageMalformed)?;
        Ok((lc * mu).mod_floor(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TEST_MODULUS_BITS: usize = 128;

    fn keypair() -> (PrivateKey, PublicKey) {
        generate_keypair(TEST_MODULUS_BITS, 2, Some(Duration::from_secs(120))).unwrap()
    }

    #[test]
    fn keypair_shape() {
        let (sk, pk) = keypair();
        assert!(pk.n.bits() >= TEST_MODULUS_BITS);
        assert_ne!(sk.p, sk.q);
        assert_eq!(&sk.p * &sk.q, pk.n);
        // Safe-prime construction keeps the totient coprime to N.
        assert!(pk.n.gcd(&sk.phi_n).is_one());
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let mut rng = StdRng::seed_from_u64(41);
        let (sk, pk) = keypair();
        for m in [
            BigInt::zero(),
            BigInt::one(),
            BigInt::from(123456789u64),
            &pk.n - BigInt::one(),
        ] {
            let c = pk.encrypt(&mut rng, &m).unwrap();
            assert_eq!(sk.decrypt(&c).unwrap(), m);
        }
    }

    #[test]
    fn rejects_out_of_range_plaintext() {
        let mut rng = StdRng::seed_from_u64(42);
        let (_, pk) = keypair();
        assert!(matches!(
            pk.encrypt(&mut rng, &pk.n),
            Err(PaillierError::MessageTooLong)
        ));
        assert!(matches!(
            pk.encrypt(&mut rng, &BigInt::from(-1i8)),
            Err(PaillierError::MessageTooLong)
        ));
    }

    #[test]
    fn homomorphic_operations() {
        let mut rng = StdRng::seed_from_u64(43);
        let (sk, pk) = keypair();
        let m1 = BigInt::from(111u8);
        let m2 = BigInt::from(222u8);

        let c1 = pk.encrypt(&mut rng, &m1).unwrap();
        let c2 = pk.encrypt(&mut rng, &m2).unwrap();

        let sum = pk.homo_add(&c1, &c2).unwrap();
        assert_eq!(sk.decrypt(&sum).unwrap(), &m1 + &m2);

        let k = BigInt::from(5u8);
        let scaled = pk.homo_mult(&k, &c1).unwrap();
        assert_eq!(sk.decrypt(&scaled).unwrap(), &m1 * &k);
    }

    #[test]
    fn malformed_ciphertext_rejected() {
        let (sk, pk) = keypair();
        assert!(matches!(
            sk.decrypt(&pk.n_square()),
            Err(PaillierError::MessageMalformed)
        ));
        assert!(matches!(
            sk.decrypt(&BigInt::zero()),
            Err(PaillierError::MessageMalformed)
        ));
        // A multiple of N shares a factor with N^2.
        assert!(matches!(
            sk.decrypt(&(&pk.n * BigInt::from(3u8))),
            Err(PaillierError::MessageMalformed)
        ));
    }

    #[test]
    fn rejects_unusable_bit_lengths() {
        assert!(generate_keypair(8, 1, None).is_err());
        assert!(generate_keypair(129, 1, None).is_err());
    }
}
