// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Round 3: verify every peer's dealing, derive the share and group key,
//! and prove knowledge of the partial secret.

use super::{gated, opened_point, state, RoundCtx};
use crate::common::int::ModInt;
use crate::crypto::commitments::HashCommitDecommit;
use crate::crypto::ecpoint::{curve_n, EcPoint};
use crate::crypto::schnorr::DlogProof;
use crate::keygen::error::KeygenError;
use crate::keygen::messages::{KGRound3Message, KGRound3Message1, KeygenMessage};
use num_bigint_dig::BigInt;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

pub(crate) fn execute<R: CryptoRng + RngCore>(
    ctx: &mut RoundCtx<'_, R>,
) -> Result<(), KeygenError> {
    let i = ctx.params.party_index();
    let n = ctx.params.party_count();
    let threshold = ctx.params.threshold();
    let my_id = state(ctx.save.own_share_id().cloned(), "own share id")?;
    let mod_q = ModInt::new(curve_n().clone());

    let mut xi = BigInt::zero();
    let mut pub_key: Option<EcPoint> = None;

    for j in 0..n {
        let kg0 = gated(ctx.inbox.round0.get(j))?;
        let kg2 = gated(ctx.inbox.round2.get(j))?;
        let kg2_poly = gated(ctx.inbox.round2_poly.get(j))?;
        let kg2_share = gated(ctx.inbox.round2_share.get(j))?;

        // Open the round-0 commitment and pin it to the vector head.
        let commitment = HashCommitDecommit {
            c: kg0.commit_u_g.clone(),
            d: kg2.decommit_u_g.clone(),
        };
        let opened = commitment
            .decommit()
            .ok_or(KeygenError::CommitmentMismatch { blame: j })?;
        let a0 = opened_point(&opened, j)?;

        let poly_commitment = &kg2_poly.poly_commitment;
        if poly_commitment.threshold() != threshold {
            return Err(KeygenError::MalformedMessage(format!(
                "party {} broadcast {} commitment points, expected {}",
                j,
                poly_commitment.threshold(),
                threshold
            )));
        }
        if poly_commitment.points[0] != a0 {
            return Err(KeygenError::CommitmentMismatch { blame: j });
        }

        let share = &kg2_share.share;
        if share.id != my_id {
            return Err(KeygenError::MalformedMessage(format!(
                "party {} addressed a share to the wrong evaluation point",
                j
            )));
        }
        if !share.verify(poly_commitment) {
            log::warn!("party {}: vss share from {} failed verification", i, j);
            return Err(KeygenError::VssVerifyFail { blame: j });
        }

        xi = mod_q.add(&xi, &share.share);
        pub_key = Some(match pub_key {
            None => poly_commitment.points[0],
            Some(acc) => acc.add(&poly_commitment.points[0]),
        });
        ctx.save.poly_commitments[j] = Some(poly_commitment.clone());
    }

    let pub_key = state(pub_key, "group public key")?;
    if pub_key.is_identity() {
        return Err(KeygenError::MalformedMessage(
            "aggregated group key is the identity".into(),
        ));
    }
    ctx.save.xi = Some(xi);
    ctx.save.pub_key = Some(pub_key);

    let u = state(ctx.temp.u.as_ref(), "partial secret")?;
    let proof_u = DlogProof::new(u, &EcPoint::scalar_base_mult(u), ctx.rng)?;
    let decommit_c_g = state(ctx.temp.commit_c_g.as_ref(), "auxiliary commitment")?
        .d
        .clone();

    ctx.outbound.push(KeygenMessage::Round3(KGRound3Message {
        from_index: i,
        proof_u,
    }));
    ctx.outbound.push(KeygenMessage::Round3Bind(KGRound3Message1 {
        from_index: i,
        decommit_c_g,
    }));

    log::info!("party {}: share and group key derived", i);
    Ok(())
}
