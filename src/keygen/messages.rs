// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Keygen wire messages.
//!
//! One tagged union covers every round; each payload carries the sender
//! index in its header. The transport is responsible for byte framing and
//! for encrypting the unicast share message to its recipient.

use crate::crypto::commitments::{HashCommitment, HashDecommitment};
use crate::crypto::dlnproof::DlnProof;
use crate::crypto::ecpoint::EcPoint;
use crate::crypto::paillier;
use crate::crypto::schnorr::DlogProof;
use crate::crypto::vss;
use num_bigint_dig::{BigInt, Sign};
use num_traits::Zero;

/// Who a message is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recipient {
    Broadcast,
    Unicast(usize),
}

/// Commitments to `u_i * G` and the auxiliary binding value `c_i * G`,
/// plus the sender's VSS evaluation point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound0Message {
    pub from_index: usize,
    pub share_id: BigInt,
    pub commit_u_g: HashCommitment,
    pub commit_c_g: HashCommitment,
}

/// The sender's Paillier public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound1Message {
    pub from_index: usize,
    pub paillier_pk: paillier::PublicKey,
}

/// Opening of the round-0 commitment to `u_i * G`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound2Message {
    pub from_index: usize,
    pub decommit_u_g: HashDecommitment,
}

/// The sender's polynomial point-commitment vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound2Message1 {
    pub from_index: usize,
    pub poly_commitment: vss::PolynomialCommitment,
}

/// A VSS share, unicast to its owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound2Message2 {
    pub from_index: usize,
    pub to_index: usize,
    pub share: vss::Share,
}

/// Schnorr proof of knowledge of `u_i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound3Message {
    pub from_index: usize,
    pub proof_u: DlogProof,
}

/// Opening of the round-0 auxiliary commitment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound3Message1 {
    pub from_index: usize,
    pub decommit_c_g: HashDecommitment,
}

/// Auxiliary modulus N~ with h1, h2 and the DLN proof pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound4Message {
    pub from_index: usize,
    pub ntilde: BigInt,
    pub h1: BigInt,
    pub h2: BigInt,
    pub proof1: DlnProof,
    pub proof2: DlnProof,
}

/// Commitment to the sender's final share point `Xi * G`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound5Message {
    pub from_index: usize,
    pub commit_xi_g: HashCommitment,
}

/// Opening of the `Xi * G` commitment with a proof of knowledge of Xi.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound5Message1 {
    pub from_index: usize,
    pub decommit_xi_g: HashDecommitment,
    pub proof_xi: DlogProof,
}

/// The sender's view of the group public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound6Message {
    pub from_index: usize,
    pub pub_key: EcPoint,
}

/// Digest over the sender's view of the shared transcript.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound6Message1 {
    pub from_index: usize,
    pub transcript_digest: BigInt,
}

/// Finalization acknowledgement; informational only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound7Message {
    pub from_index: usize,
}

/// All keygen messages as one tagged union.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeygenMessage {
    Round0(KGRound0Message),
    Round1(KGRound1Message),
    Round2(KGRound2Message),
    Round2Poly(KGRound2Message1),
    Round2Share(KGRound2Message2),
    Round3(KGRound3Message),
    Round3Bind(KGRound3Message1),
    Round4(KGRound4Message),
    Round5(KGRound5Message),
    Round5Open(KGRound5Message1),
    Round6(KGRound6Message),
    Round6Digest(KGRound6Message1),
    Round7(KGRound7Message),
}

impl KeygenMessage {
    pub fn from_index(&self) -> usize {
        match self {
            KeygenMessage::Round0(m) => m.from_index,
            KeygenMessage::Round1(m) => m.from_index,
            KeygenMessage::Round2(m) => m.from_index,
            KeygenMessage::Round2Poly(m) => m.from_index,
            KeygenMessage::Round2Share(m) => m.from_index,
            KeygenMessage::Round3(m) => m.from_index,
            KeygenMessage::Round3Bind(m) => m.from_index,
            KeygenMessage::Round4(m) => m.from_index,
            KeygenMessage::Round5(m) => m.from_index,
            KeygenMessage::Round5Open(m) => m.from_index,
            KeygenMessage::Round6(m) => m.from_index,
            KeygenMessage::Round6Digest(m) => m.from_index,
            KeygenMessage::Round7(m) => m.from_index,
        }
    }

    /// The round the message belongs to.
    pub fn round_number(&self) -> u8 {
        match self {
            KeygenMessage::Round0(_) => 0,
            KeygenMessage::Round1(_) => 1,
            KeygenMessage::Round2(_)
            | KeygenMessage::Round2Poly(_)
            | KeygenMessage::Round2Share(_) => 2,
            KeygenMessage::Round3(_) | KeygenMessage::Round3Bind(_) => 3,
            KeygenMessage::Round4(_) => 4,
            KeygenMessage::Round5(_) | KeygenMessage::Round5Open(_) => 5,
            KeygenMessage::Round6(_) | KeygenMessage::Round6Digest(_) => 6,
            KeygenMessage::Round7(_) => 7,
        }
    }

    pub fn recipient(&self) -> Recipient {
        match self {
            KeygenMessage::Round2Share(m) => Recipient::Unicast(m.to_index),
            _ => Recipient::Broadcast,
        }
    }

    /// Structural validation: required fields present, integers
    /// non-negative and non-degenerate. Anything deeper happens in the
    /// round logic.
    pub fn validate_basic(&self) -> bool {
        fn positive(v: &BigInt) -> bool {
            v.sign() == Sign::Plus
        }
        match self {
            KeygenMessage::Round0(m) => {
                positive(&m.commit_u_g) && positive(&m.commit_c_g) && !m.share_id.is_zero()
            }
            KeygenMessage::Round1(m) => positive(&m.paillier_pk.n),
            KeygenMessage::Round2(m) => !m.decommit_u_g.is_empty(),
            KeygenMessage::Round2Poly(m) => !m.poly_commitment.points.is_empty(),
            KeygenMessage::Round2Share(m) => positive(&m.share.id),
            KeygenMessage::Round3(m) => !m.proof_u.alpha.is_identity(),
            KeygenMessage::Round3Bind(m) => !m.decommit_c_g.is_empty(),
            KeygenMessage::Round4(m) => {
                positive(&m.ntilde) && positive(&m.h1) && positive(&m.h2)
            }
            KeygenMessage::Round5(m) => positive(&m.commit_xi_g),
            KeygenMessage::Round5Open(m) => {
                !m.decommit_xi_g.is_empty() && !m.proof_xi.alpha.is_identity()
            }
            KeygenMessage::Round6(m) => !m.pub_key.is_identity(),
            KeygenMessage::Round6Digest(m) => positive(&m.transcript_digest),
            KeygenMessage::Round7(_) => true,
        }
    }
}
