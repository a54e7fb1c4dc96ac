// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Round 1: record peer share ids and generate the Paillier keypair.

use super::{gated, RoundCtx};
use crate::crypto::ecpoint::curve_n;
use crate::crypto::paillier;
use crate::keygen::error::KeygenError;
use crate::keygen::messages::{KGRound1Message, KeygenMessage};
use num_integer::Integer;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

pub(crate) fn execute<R: CryptoRng + RngCore>(
    ctx: &mut RoundCtx<'_, R>,
) -> Result<(), KeygenError> {
    let i = ctx.params.party_index();

    for j in 0..ctx.params.party_count() {
        let msg = gated(ctx.inbox.round0.get(j))?;
        if msg.share_id.mod_floor(curve_n()).is_zero() {
            return Err(KeygenError::ShareIdInvalid);
        }
        ctx.save.share_ids[j] = Some(msg.share_id.clone());
    }

    // Takes seconds at production sizes; runs on the safe-prime workers.
    let (sk, pk) = paillier::generate_keypair(
        ctx.params.paillier_key_length(),
        ctx.params.concurrency(),
        Some(ctx.params.safe_prime_timeout()),
    )?;
    ctx.save.paillier_sk = Some(sk);

    ctx.outbound.push(KeygenMessage::Round1(KGRound1Message {
        from_index: i,
        paillier_pk: pk,
    }));

    log::debug!("party {}: paillier keypair generated", i);
    Ok(())
}
