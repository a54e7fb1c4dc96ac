// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Distributed key generation for a threshold-ECDSA signing group over
//! secp256k1.
//!
//! Each participant runs a [`keygen::LocalNode`] which drives the keygen
//! rounds, consumes messages delivered by the caller's transport and emits
//! outbound messages plus, on success, the party's persistent
//! [`keygen::LocalSaveData`].

pub mod common;
pub mod crypto;
pub mod keygen;

pub(crate) mod serde_support;
