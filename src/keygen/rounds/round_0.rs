// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Round 0: sample the partial secret and broadcast binding commitments.

use super::{state, RoundCtx};
use crate::common::random::get_random_int_from_zn;
use crate::crypto::commitments::HashCommitDecommit;
use crate::crypto::ecpoint::{curve_n, EcPoint};
use crate::keygen::error::KeygenError;
use crate::keygen::messages::{KGRound0Message, KeygenMessage};
use num_bigint_dig::BigInt;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

/// A uniform nonzero scalar. Zero would put the commitment point at
/// infinity, which peers reject.
pub(crate) fn sample_scalar<R: CryptoRng + RngCore>(rng: &mut R) -> Result<BigInt, KeygenError> {
    loop {
        let v = get_random_int_from_zn(rng, curve_n()).map_err(|_| KeygenError::RngFailure)?;
        if !v.is_zero() {
            return Ok(v);
        }
    }
}

fn commit_to_point<R: CryptoRng + RngCore>(
    rng: &mut R,
    point: &EcPoint,
) -> Result<HashCommitDecommit, KeygenError> {
    let (x, y) = point.coords();
    HashCommitDecommit::new(rng, &[&x, &y]).ok_or(KeygenError::RngFailure)
}

pub(crate) fn execute<R: CryptoRng + RngCore>(
    ctx: &mut RoundCtx<'_, R>,
) -> Result<(), KeygenError> {
    let i = ctx.params.party_index();
    let share_id = state(ctx.save.own_share_id().cloned(), "own share id")?;

    let u = sample_scalar(ctx.rng)?;
    let commit_u_g = commit_to_point(ctx.rng, &EcPoint::scalar_base_mult(&u))?;

    // Auxiliary binding scalar, committed now and opened in round 3.
    let c = sample_scalar(ctx.rng)?;
    let commit_c_g = commit_to_point(ctx.rng, &EcPoint::scalar_base_mult(&c))?;

    ctx.outbound.push(KeygenMessage::Round0(KGRound0Message {
        from_index: i,
        share_id,
        commit_u_g: commit_u_g.c.clone(),
        commit_c_g: commit_c_g.c.clone(),
    }));

    ctx.temp.u = Some(u);
    ctx.temp.c = Some(c);
    ctx.temp.commit_u_g = Some(commit_u_g);
    ctx.temp.commit_c_g = Some(commit_c_g);

    log::debug!("party {}: round 0 commitments broadcast", i);
    Ok(())
}
