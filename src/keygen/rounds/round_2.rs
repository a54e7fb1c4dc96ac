// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Round 2: deal the VSS shares and prepare the N~ safe primes.

use super::{state, RoundCtx};
use crate::common::safe_prime::get_random_safe_primes;
use crate::crypto::vss;
use crate::keygen::error::KeygenError;
use crate::keygen::messages::{
    KGRound2Message, KGRound2Message1, KGRound2Message2, KeygenMessage,
};
use num_bigint_dig::BigInt;
use rand::{CryptoRng, RngCore};

pub(crate) fn execute<R: CryptoRng + RngCore>(
    ctx: &mut RoundCtx<'_, R>,
) -> Result<(), KeygenError> {
    let i = ctx.params.party_index();
    let n = ctx.params.party_count();

    let u = state(ctx.temp.u.clone(), "partial secret")?;
    let (poly, poly_commitment) = vss::init(&u, ctx.params.threshold(), ctx.rng)?;

    let ids: Vec<BigInt> = (0..n)
        .map(|j| state(ctx.save.share_ids[j].clone(), "peer share id"))
        .collect::<Result<_, _>>()?;
    let shares = poly.shares(&ids)?;

    // Fresh safe primes for N~; the Paillier primes are never reused here.
    let ntilde_primes = loop {
        let mut primes = get_random_safe_primes(
            ctx.params.safe_prime_bits(),
            2,
            ctx.params.concurrency(),
            Some(ctx.params.safe_prime_timeout()),
        )?;
        let sp2 = primes.pop().expect("two primes requested");
        let sp1 = primes.pop().expect("two primes requested");
        let ntilde = sp1.safe_prime() * sp2.safe_prime();
        if ntilde.bits() >= ctx.params.paillier_key_length() {
            break (sp1, sp2);
        }
    };

    let decommit_u_g = state(ctx.temp.commit_u_g.as_ref(), "round 0 commitment")?
        .d
        .clone();
    ctx.outbound.push(KeygenMessage::Round2(KGRound2Message {
        from_index: i,
        decommit_u_g,
    }));
    ctx.outbound.push(KeygenMessage::Round2Poly(KGRound2Message1 {
        from_index: i,
        poly_commitment: poly_commitment.clone(),
    }));
    for (j, share) in shares.iter().enumerate() {
        ctx.outbound.push(KeygenMessage::Round2Share(KGRound2Message2 {
            from_index: i,
            to_index: j,
            share: share.clone(),
        }));
    }

    ctx.temp.poly = Some(poly);
    ctx.temp.poly_commitment = Some(poly_commitment);
    ctx.temp.shares = Some(shares);
    ctx.temp.ntilde_primes = Some(ntilde_primes);

    log::debug!("party {}: vss shares dealt to {} parties", i, n);
    Ok(())
}
