// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Per-party persistent output and ephemeral round state.

use crate::common::safe_prime::GermainSafePrime;
use crate::crypto::commitments::HashCommitDecommit;
use crate::crypto::ecpoint::EcPoint;
use crate::crypto::paillier;
use crate::crypto::vss;
use num_bigint_dig::BigInt;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A peer's auxiliary range-proof modulus with its two group elements.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NtildeH1H2 {
    #[serde(with = "crate::serde_support::bigint_bytes")]
    pub ntilde: BigInt,
    #[serde(with = "crate::serde_support::bigint_bytes")]
    pub h1: BigInt,
    #[serde(with = "crate::serde_support::bigint_bytes")]
    pub h2: BigInt,
}

/// Everything a party persists after a successful keygen: its own secret
/// share and Paillier key, plus the public material of every peer that the
/// signing protocol needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSaveData {
    pub party_index: usize,
    /// The party's share of the group private key.
    #[serde(with = "crate::serde_support::opt_bigint_bytes")]
    pub xi: Option<BigInt>,
    /// Group public key `Y`.
    pub pub_key: Option<EcPoint>,
    /// Every party's VSS evaluation point, own index included.
    #[serde(with = "crate::serde_support::vec_opt_bigint_bytes")]
    pub share_ids: Vec<Option<BigInt>>,
    pub paillier_sk: Option<paillier::PrivateKey>,
    pub paillier_pks: Vec<Option<paillier::PublicKey>>,
    pub ntilde_h1h2: Vec<Option<NtildeH1H2>>,
    pub poly_commitments: Vec<Option<vss::PolynomialCommitment>>,
}

impl LocalSaveData {
    pub fn new(party_count: usize, party_index: usize) -> Self {
        LocalSaveData {
            party_index,
            xi: None,
            pub_key: None,
            share_ids: vec![None; party_count],
            paillier_sk: None,
            paillier_pks: vec![None; party_count],
            ntilde_h1h2: vec![None; party_count],
            poly_commitments: vec![None; party_count],
        }
    }

    /// The party's own secret share, once round 3 has produced it.
    pub fn xi(&self) -> Option<&BigInt> {
        self.xi.as_ref()
    }

    /// The party's own VSS evaluation point.
    pub fn own_share_id(&self) -> Option<&BigInt> {
        self.share_ids[self.party_index].as_ref()
    }

    /// True once every per-peer section is populated.
    pub fn is_complete(&self) -> bool {
        self.xi().is_some()
            && self.pub_key.is_some()
            && self.paillier_sk.is_some()
            && self.share_ids.iter().all(Option::is_some)
            && self.paillier_pks.iter().all(Option::is_some)
            && self.ntilde_h1h2.iter().all(Option::is_some)
            && self.poly_commitments.iter().all(Option::is_some)
    }
}

/// Ephemeral secrets and commitments held between rounds, destroyed once
/// the session finishes or aborts.
#[derive(Debug, Default)]
pub(crate) struct TempState {
    /// Partial secret `u_i` (round 0).
    pub u: Option<BigInt>,
    /// Auxiliary binding scalar `c_i` (round 0).
    pub c: Option<BigInt>,
    pub commit_u_g: Option<HashCommitDecommit>,
    pub commit_c_g: Option<HashCommitDecommit>,
    /// Sharing polynomial (round 2).
    pub poly: Option<vss::Polynomial>,
    pub poly_commitment: Option<vss::PolynomialCommitment>,
    /// Outgoing shares, one per peer (round 2).
    pub shares: Option<Vec<vss::Share>>,
    /// Safe-prime pairs behind N~ (round 2, destroyed after the DLN
    /// proofs in round 4).
    pub ntilde_primes: Option<(GermainSafePrime, GermainSafePrime)>,
    pub commit_xi_g: Option<HashCommitDecommit>,
    /// Digest over the session transcript (round 6).
    pub transcript_digest: Option<BigInt>,
}

impl TempState {
    /// Zeroizes scalar secrets and drops everything else.
    pub fn clear(&mut self) {
        if let Some(u) = self.u.as_mut() {
            u.zeroize();
        }
        if let Some(c) = self.c.as_mut() {
            c.zeroize();
        }
        if let Some(poly) = self.poly.as_mut() {
            poly.zeroize();
        }
        if let Some(shares) = self.shares.as_mut() {
            for share in shares.iter_mut() {
                share.share.zeroize();
            }
        }
        *self = TempState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    #[test]
    fn starts_empty() {
        let save = LocalSaveData::new(3, 1);
        assert!(!save.is_complete());
        assert!(save.xi().is_none());
        assert!(save.own_share_id().is_none());
        assert_eq!(save.share_ids.len(), 3);
    }

    #[test]
    fn temp_state_clears() {
        let mut temp = TempState {
            u: Some(BigInt::one()),
            c: Some(BigInt::one()),
            transcript_digest: Some(BigInt::one()),
            ..TempState::default()
        };
        temp.clear();
        assert!(temp.u.is_none());
        assert!(temp.c.is_none());
        assert!(temp.transcript_digest.is_none());
    }
}
