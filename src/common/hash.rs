// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! SHA-512/256 hashing over delimited, length-prefixed inputs.
//!
//! Inputs are framed (count prefix, per-item delimiter and length) so that
//! concatenation ambiguity and length-extension do not apply.

use num_bigint_dig::{BigInt, Sign};
use num_integer::Integer;
use sha2::{Digest, Sha512_256};

const HASH_INPUT_DELIMITER: u8 = b'$';

fn prepare_hash_data(inputs: &[&[u8]]) -> Option<Vec<u8>> {
    if inputs.is_empty() {
        return None;
    }

    let bz_size: usize = inputs.iter().map(|bz| bz.len()).sum();
    let mut data = Vec::with_capacity(8 + bz_size + inputs.len() * 9);

    data.extend_from_slice(&(inputs.len() as u64).to_le_bytes());
    for bz in inputs {
        data.extend_from_slice(bz);
        data.push(HASH_INPUT_DELIMITER);
        data.extend_from_slice(&(bz.len() as u64).to_le_bytes());
    }
    Some(data)
}

/// SHA-512/256 of the framed input slices.
pub fn sha512_256(inputs: &[&[u8]]) -> Option<Vec<u8>> {
    let data = prepare_hash_data(inputs)?;
    Some(Sha512_256::digest(&data).to_vec())
}

/// SHA-512/256 over big integers, big-endian encoded, as a big integer.
pub fn sha512_256i(inputs: &[&BigInt]) -> Option<BigInt> {
    let input_bytes: Vec<Vec<u8>> = inputs.iter().map(|n| n.to_bytes_be().1).collect();
    let input_slices: Vec<&[u8]> = input_bytes.iter().map(|v| v.as_slice()).collect();
    let digest = sha512_256(&input_slices)?;
    Some(BigInt::from_bytes_be(Sign::Plus, &digest))
}

/// Maps a hash output into `[0, q)`.
///
/// The hash is at most 256 bits and `q` is the 256-bit secp256k1 group
/// order, so a plain reduction loses no meaningful uniformity.
pub fn rejection_sample(q: &BigInt, e_hash: &BigInt) -> BigInt {
    e_hash.mod_floor(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    #[test]
    fn empty_input_is_rejected() {
        assert!(sha512_256(&[]).is_none());
        assert!(sha512_256i(&[]).is_none());
    }

    #[test]
    fn framing_distinguishes_split_points() {
        let a = sha512_256(&[b"ab", b"c"]).unwrap();
        let b = sha512_256(&[b"a", b"bc"]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn digest_is_stable_and_256_bits() {
        let x = BigInt::from(7u8);
        let y = BigInt::from(11u8);
        let h1 = sha512_256i(&[&x, &y]).unwrap();
        let h2 = sha512_256i(&[&x, &y]).unwrap();
        assert_eq!(h1, h2);
        assert!(h1.bits() <= 256);
        assert_ne!(h1, sha512_256i(&[&y, &x]).unwrap());
    }

    #[test]
    fn rejection_sample_reduces() {
        let q = BigInt::from(97u8);
        let e = BigInt::from(1000u16);
        let r = rejection_sample(&q, &e);
        assert!(r >= BigInt::zero() && r < q);
    }
}
