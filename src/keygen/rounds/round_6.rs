// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Round 6: check every party's opened share point against the aggregate
//! polynomial and exchange the cross-verification artifacts.

use super::{gated, opened_point, state, transcript_digest, RoundCtx};
use crate::crypto::commitments::HashCommitDecommit;
use crate::crypto::ecpoint::EcPoint;
use crate::keygen::error::KeygenError;
use crate::keygen::messages::{KGRound6Message, KGRound6Message1, KeygenMessage};
use rand::{CryptoRng, RngCore};

pub(crate) fn execute<R: CryptoRng + RngCore>(
    ctx: &mut RoundCtx<'_, R>,
) -> Result<(), KeygenError> {
    let i = ctx.params.party_index();
    let n = ctx.params.party_count();

    for j in 0..n {
        let kg5 = gated(ctx.inbox.round5.get(j))?;
        let kg5_open = gated(ctx.inbox.round5_open.get(j))?;

        let commitment = HashCommitDecommit {
            c: kg5.commit_xi_g.clone(),
            d: kg5_open.decommit_xi_g.clone(),
        };
        let opened = commitment
            .decommit()
            .ok_or(KeygenError::CommitmentMismatch { blame: j })?;
        let xj_g = opened_point(&opened, j)?;

        // The aggregate polynomial evaluated at party j's id must equal
        // the share point j just opened.
        let id_j = state(ctx.save.share_ids[j].as_ref(), "peer share id")?;
        let mut expected: Option<EcPoint> = None;
        for commitment in &ctx.save.poly_commitments {
            let commitment = state(commitment.as_ref(), "poly commitment")?;
            let term = commitment.evaluate(id_j);
            expected = Some(match expected {
                None => term,
                Some(acc) => acc.add(&term),
            });
        }
        if Some(xj_g) != expected {
            log::warn!("party {}: share point of {} is off the aggregate polynomial", i, j);
            return Err(KeygenError::BindingFail { blame: j });
        }
        if !kg5_open.proof_xi.verify(&xj_g) {
            return Err(KeygenError::BindingFail { blame: j });
        }
    }

    let digest = transcript_digest(ctx.save)?;
    let pub_key = state(ctx.save.pub_key, "group public key")?;
    ctx.temp.transcript_digest = Some(digest.clone());

    ctx.outbound.push(KeygenMessage::Round6(KGRound6Message {
        from_index: i,
        pub_key,
    }));
    ctx.outbound.push(KeygenMessage::Round6Digest(KGRound6Message1 {
        from_index: i,
        transcript_digest: digest,
    }));

    log::debug!("party {}: binding checks passed", i);
    Ok(())
}
