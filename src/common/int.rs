// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Modular arithmetic over a fixed positive modulus.

use num_bigint_dig::{BigInt, ModInverse, Sign};
use num_integer::Integer;
use num_traits::Signed;

/// A modulus together with the usual field/ring operations.
///
/// Results are always reduced into `[0, modulus)`, including for negative
/// intermediate values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModInt {
    modulus: BigInt,
}

impl ModInt {
    pub fn new(modulus: BigInt) -> Self {
        assert!(modulus.sign() == Sign::Plus, "modulus must be positive");
        ModInt { modulus }
    }

    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    pub fn add(&self, x: &BigInt, y: &BigInt) -> BigInt {
        (x + y).mod_floor(&self.modulus)
    }

    pub fn sub(&self, x: &BigInt, y: &BigInt) -> BigInt {
        (x - y).mod_floor(&self.modulus)
    }

    pub fn mul(&self, x: &BigInt, y: &BigInt) -> BigInt {
        (x * y).mod_floor(&self.modulus)
    }

    pub fn exp(&self, base: &BigInt, exponent: &BigInt) -> BigInt {
        base.mod_floor(&self.modulus).modpow(exponent, &self.modulus)
    }

    /// `g^-1 mod modulus`, or `None` when `gcd(g, modulus) != 1`.
    pub fn mod_inverse(&self, g: &BigInt) -> Option<BigInt> {
        let g = g.mod_floor(&self.modulus).to_biguint()?;
        let m = self.modulus.to_biguint()?;
        let inv = g.mod_inverse(&m)?;
        Some(inv.mod_floor(&self.modulus))
    }

    /// `x * y^-1 mod modulus`, or `None` when `y` is not invertible.
    pub fn div(&self, x: &BigInt, y: &BigInt) -> Option<BigInt> {
        self.mod_inverse(y).map(|y_inv| self.mul(x, &y_inv))
    }
}

/// `0 <= b < bound`.
pub fn is_in_interval(b: &BigInt, bound: &BigInt) -> bool {
    !b.is_negative() && b < bound
}
