// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Per-round execution logic.
//!
//! Each round is a function of the completed inbox slices and the node's
//! temp/save state; it mutates state and pushes outbound messages. Gating
//! (when a round may run) lives in the driver.

use crate::common::hash::sha512_256i;
use crate::crypto::ecpoint::EcPoint;
use crate::keygen::error::KeygenError;
use crate::keygen::inbox::MessageInbox;
use crate::keygen::messages::KeygenMessage;
use crate::keygen::params::KeygenParams;
use crate::keygen::save_data::{LocalSaveData, TempState};
use num_bigint_dig::BigInt;
use rand::{CryptoRng, RngCore};

pub(crate) mod round_0;
pub(crate) mod round_1;
pub(crate) mod round_2;
pub(crate) mod round_3;
pub(crate) mod round_4;
pub(crate) mod round_5;
pub(crate) mod round_6;
pub(crate) mod round_7;

/// Borrowed view of everything a round may touch.
pub(crate) struct RoundCtx<'a, R: CryptoRng + RngCore> {
    pub params: &'a KeygenParams,
    pub temp: &'a mut TempState,
    pub save: &'a mut LocalSaveData,
    pub inbox: &'a MessageInbox,
    pub rng: &'a mut R,
    pub outbound: &'a mut Vec<KeygenMessage>,
}

/// Reads a slot the round's gate guarantees to be present.
pub(crate) fn gated<M>(slot: Option<&M>) -> Result<&M, KeygenError> {
    slot.ok_or_else(|| KeygenError::InvalidParameters("round gate violated".into()))
}

/// Reads state an earlier round is responsible for having produced.
pub(crate) fn state<T>(v: Option<T>, what: &str) -> Result<T, KeygenError> {
    v.ok_or_else(|| KeygenError::InvalidParameters(format!("missing round state: {}", what)))
}

/// Digest over the session transcript: the group key, every share id and
/// every broadcast polynomial commitment, in party order.
pub(crate) fn transcript_digest(save: &LocalSaveData) -> Result<BigInt, KeygenError> {
    let pub_key = state(save.pub_key.as_ref(), "group public key")?;
    let (yx, yy) = pub_key.coords();

    let mut values: Vec<BigInt> = vec![yx, yy];
    for id in &save.share_ids {
        values.push(state(id.as_ref(), "share id")?.clone());
    }
    for commitment in &save.poly_commitments {
        let commitment = state(commitment.as_ref(), "polynomial commitment")?;
        for point in &commitment.points {
            let (x, y) = point.coords();
            values.push(x);
            values.push(y);
        }
    }
    let refs: Vec<&BigInt> = values.iter().collect();
    sha512_256i(&refs).ok_or_else(|| KeygenError::InvalidParameters("empty transcript".into()))
}

/// The commitment a party opens must reveal exactly one curve point.
pub(crate) fn opened_point(values: &[BigInt], blame: usize) -> Result<EcPoint, KeygenError> {
    if values.len() != 2 {
        return Err(KeygenError::CommitmentMismatch { blame });
    }
    EcPoint::from_coords(&values[0], &values[1])
        .map_err(|_| KeygenError::CommitmentMismatch { blame })
}
