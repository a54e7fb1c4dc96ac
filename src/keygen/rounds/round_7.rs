// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Round 7: cross-check every party's view of the result and acknowledge.
//!
//! The driver seals SaveData and destroys the temp state right after this
//! round returns.

use super::{gated, state, RoundCtx};
use crate::keygen::error::KeygenError;
use crate::keygen::messages::{KGRound7Message, KeygenMessage};
use rand::{CryptoRng, RngCore};

pub(crate) fn execute<R: CryptoRng + RngCore>(
    ctx: &mut RoundCtx<'_, R>,
) -> Result<(), KeygenError> {
    let i = ctx.params.party_index();
    let pub_key = state(ctx.save.pub_key, "group public key")?;
    let digest = state(ctx.temp.transcript_digest.clone(), "transcript digest")?;

    for j in 0..ctx.params.party_count() {
        let kg6 = gated(ctx.inbox.round6.get(j))?;
        let kg6_digest = gated(ctx.inbox.round6_digest.get(j))?;

        if kg6.pub_key != pub_key {
            log::warn!("party {}: party {} derived a different group key", i, j);
            return Err(KeygenError::BindingFail { blame: j });
        }
        if kg6_digest.transcript_digest != digest {
            log::warn!("party {}: party {} saw a different transcript", i, j);
            return Err(KeygenError::BindingFail { blame: j });
        }
    }

    // Informational only; termination never waits for peer acks.
    ctx.outbound
        .push(KeygenMessage::Round7(KGRound7Message { from_index: i }));

    log::info!("party {}: keygen finalized", i);
    Ok(())
}
