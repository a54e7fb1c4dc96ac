// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

pub mod commitments;
pub mod dlnproof;
pub mod ecpoint;
pub mod paillier;
pub mod schnorr;
pub mod vss;
