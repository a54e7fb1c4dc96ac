// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Round 4: check the round-3 proofs and openings, then publish the
//! auxiliary modulus N~ with h1, h2 and their DLN proof pair.

use super::{gated, opened_point, state, RoundCtx};
use crate::common::int::ModInt;
use crate::common::random::{
    get_random_int_from_zn_star, get_random_quadratic_residue_generator,
};
use crate::crypto::commitments::HashCommitDecommit;
use crate::crypto::dlnproof::DlnProof;
use crate::keygen::error::KeygenError;
use crate::keygen::messages::{KGRound4Message, KeygenMessage};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

pub(crate) fn execute<R: CryptoRng + RngCore>(
    ctx: &mut RoundCtx<'_, R>,
) -> Result<(), KeygenError> {
    let i = ctx.params.party_index();

    for j in 0..ctx.params.party_count() {
        let kg0 = gated(ctx.inbox.round0.get(j))?;
        let kg3 = gated(ctx.inbox.round3.get(j))?;
        let kg3_bind = gated(ctx.inbox.round3_bind.get(j))?;

        let a0 = &state(ctx.save.poly_commitments[j].as_ref(), "poly commitment")?.points[0];
        if !kg3.proof_u.verify(a0) {
            log::warn!("party {}: schnorr proof from {} failed", i, j);
            return Err(KeygenError::SchnorrProofFail { blame: j });
        }

        // The auxiliary commitment from round 0 must open to a point.
        let commitment = HashCommitDecommit {
            c: kg0.commit_c_g.clone(),
            d: kg3_bind.decommit_c_g.clone(),
        };
        let opened = commitment
            .decommit()
            .ok_or(KeygenError::CommitmentMismatch { blame: j })?;
        opened_point(&opened, j)?;
    }

    let (mut sp1, mut sp2) = state(ctx.temp.ntilde_primes.take(), "ntilde primes")?;
    let ntilde = sp1.safe_prime() * sp2.safe_prime();
    let pq = sp1.prime() * sp2.prime();

    let h1 = get_random_quadratic_residue_generator(ctx.rng, &ntilde)
        .map_err(|_| KeygenError::RngFailure)?;
    let (alpha, h2) = loop {
        let alpha = get_random_int_from_zn_star(ctx.rng, &pq)
            .map_err(|_| KeygenError::RngFailure)?;
        let h2 = h1.modpow(&alpha, &ntilde);
        if h2 != h1 {
            break (alpha, h2);
        }
    };
    let beta = ModInt::new(pq.clone())
        .mod_inverse(&alpha)
        .ok_or_else(|| KeygenError::InvalidParameters("alpha is not invertible".into()))?;

    let proof1 = DlnProof::new(&h1, &h2, &alpha, sp1.prime(), sp2.prime(), &ntilde, ctx.rng)?;
    let proof2 = DlnProof::new(&h2, &h1, &beta, sp1.prime(), sp2.prime(), &ntilde, ctx.rng)?;

    // The factorization of N~ must not outlive its proofs.
    sp1.zeroize();
    sp2.zeroize();

    ctx.outbound.push(KeygenMessage::Round4(KGRound4Message {
        from_index: i,
        ntilde,
        h1,
        h2,
        proof1,
        proof2,
    }));

    log::debug!("party {}: ntilde material broadcast", i);
    Ok(())
}
