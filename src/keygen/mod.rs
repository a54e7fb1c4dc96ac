// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Distributed key generation for threshold ECDSA over secp256k1.
//!
//! The protocol runs eight broadcast rounds per party: commitments to the
//! partial secret (round 0), Paillier keygen (1), Feldman VSS distribution
//! (2), share verification and proof of the partial secret (3), auxiliary
//! N~/h1/h2 material with DLN proofs (4), commitment to the final share
//! point (5), binding verification (6) and finalization (7).

pub mod error;
pub mod local_node;
pub mod messages;
pub mod params;
pub mod save_data;

mod inbox;
mod rounds;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{Abort, KeygenError};
pub use local_node::{KeygenStage, LocalNode};
pub use messages::{KeygenMessage, Recipient};
pub use params::KeygenParams;
pub use save_data::{LocalSaveData, NtildeH1H2};
