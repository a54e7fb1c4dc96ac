// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! secp256k1 group elements with big-integer affine coordinates.
//!
//! Wraps `k256` arithmetic behind the BigInt-based interface the protocol
//! layer works in. Transmitted points are always finite; the point at
//! infinity only ever appears as an intermediate sum and is observable
//! through [`EcPoint::is_identity`].

use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::{Group, PrimeField};
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar};
use num_bigint_dig::{BigInt, Sign};
use num_integer::Integer;
use num_traits::Zero;
use once_cell::sync::Lazy;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Order of the secp256k1 group.
static CURVE_N: Lazy<BigInt> = Lazy::new(|| {
    BigInt::parse_bytes(
        b"FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
        16,
    )
    .expect("valid hex constant")
});

/// The prime order `q` of the secp256k1 base point.
pub fn curve_n() -> &'static BigInt {
    &CURVE_N
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PointError {
    #[error("point is not on the curve")]
    NotOnCurve,
    #[error("coordinate is negative or wider than the field")]
    InvalidCoords,
    #[error("invalid point encoding: {0}")]
    InvalidEncoding(String),
}

/// A secp256k1 point.
#[derive(Clone, Copy)]
pub struct EcPoint(ProjectivePoint);

impl PartialEq for EcPoint {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for EcPoint {}

impl EcPoint {
    /// The base point G.
    pub fn generator() -> Self {
        EcPoint(ProjectivePoint::GENERATOR)
    }

    /// `k * G`, with `k` reduced modulo the group order.
    pub fn scalar_base_mult(k: &BigInt) -> Self {
        EcPoint(ProjectivePoint::GENERATOR * scalar_from_bigint(k))
    }

    /// `k * self`, with `k` reduced modulo the group order.
    pub fn scalar_mul(&self, k: &BigInt) -> Self {
        EcPoint(self.0 * scalar_from_bigint(k))
    }

    pub fn add(&self, other: &Self) -> Self {
        EcPoint(self.0 + other.0)
    }

    pub fn is_identity(&self) -> bool {
        bool::from(self.0.is_identity())
    }

    /// Builds a point from affine coordinates, rejecting anything that is
    /// not a finite curve point.
    pub fn from_coords(x: &BigInt, y: &BigInt) -> Result<Self, PointError> {
        let x = coord_bytes(x)?;
        let y = coord_bytes(y)?;
        let encoded = EncodedPoint::from_affine_coordinates(&x, &y, false);
        let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or(PointError::NotOnCurve)?;
        Ok(EcPoint(ProjectivePoint::from(affine)))
    }

    /// Affine coordinates; `(0, 0)` for the identity.
    pub fn coords(&self) -> (BigInt, BigInt) {
        let encoded = self.0.to_affine().to_encoded_point(false);
        match (encoded.x(), encoded.y()) {
            (Some(x), Some(y)) => (
                BigInt::from_bytes_be(Sign::Plus, x),
                BigInt::from_bytes_be(Sign::Plus, y),
            ),
            _ => (BigInt::zero(), BigInt::zero()),
        }
    }

    pub fn x(&self) -> BigInt {
        self.coords().0
    }

    pub fn y(&self) -> BigInt {
        self.coords().1
    }

    /// SEC1 uncompressed encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_affine().to_encoded_point(false).as_bytes().to_vec()
    }

    /// Parses a SEC1 encoding, rejecting the identity.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PointError> {
        let encoded = EncodedPoint::from_bytes(bytes)
            .map_err(|e| PointError::InvalidEncoding(e.to_string()))?;
        if encoded.is_identity() {
            return Err(PointError::NotOnCurve);
        }
        let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or(PointError::NotOnCurve)?;
        Ok(EcPoint(ProjectivePoint::from(affine)))
    }
}

fn scalar_from_bigint(k: &BigInt) -> Scalar {
    let reduced = k.mod_floor(&CURVE_N);
    let (_, bytes) = reduced.to_bytes_be();
    let mut repr = [0u8; 32];
    repr[32 - bytes.len()..].copy_from_slice(&bytes);
    Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(repr)))
        .expect("value is reduced below the group order")
}

fn coord_bytes(v: &BigInt) -> Result<FieldBytes, PointError> {
    if v.sign() == Sign::Minus {
        return Err(PointError::InvalidCoords);
    }
    let (_, bytes) = v.to_bytes_be();
    if bytes.len() > 32 {
        return Err(PointError::InvalidCoords);
    }
    let mut fixed = [0u8; 32];
    fixed[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(FieldBytes::from(fixed))
}

impl fmt::Debug for EcPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            return write!(f, "EcPoint(identity)");
        }
        let (x, y) = self.coords();
        write!(f, "EcPoint({:x}, {:x})", x, y)
    }
}

impl Serialize for EcPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_bytes().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EcPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        EcPoint::from_bytes(&bytes).map_err(de::Error::custom)
    }
}
