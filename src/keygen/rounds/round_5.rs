// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Round 5: commit to the final share point `Xi * G` and open it with a
//! proof of knowledge, so later signing runs cannot equivocate about Xi.

use super::{state, RoundCtx};
use crate::crypto::commitments::HashCommitDecommit;
use crate::crypto::ecpoint::EcPoint;
use crate::crypto::schnorr::DlogProof;
use crate::keygen::error::KeygenError;
use crate::keygen::messages::{KGRound5Message, KGRound5Message1, KeygenMessage};
use rand::{CryptoRng, RngCore};

pub(crate) fn execute<R: CryptoRng + RngCore>(
    ctx: &mut RoundCtx<'_, R>,
) -> Result<(), KeygenError> {
    let i = ctx.params.party_index();
    let xi = state(ctx.save.xi.clone(), "local share")?;

    let xi_g = EcPoint::scalar_base_mult(&xi);
    let (x, y) = xi_g.coords();
    let commitment =
        HashCommitDecommit::new(ctx.rng, &[&x, &y]).ok_or(KeygenError::RngFailure)?;
    let proof_xi = DlogProof::new(&xi, &xi_g, ctx.rng)?;

    ctx.outbound.push(KeygenMessage::Round5(KGRound5Message {
        from_index: i,
        commit_xi_g: commitment.c.clone(),
    }));
    ctx.outbound.push(KeygenMessage::Round5Open(KGRound5Message1 {
        from_index: i,
        decommit_xi_g: commitment.d.clone(),
        proof_xi,
    }));
    ctx.temp.commit_xi_g = Some(commitment);

    log::debug!("party {}: share point committed", i);
    Ok(())
}
