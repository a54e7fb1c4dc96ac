// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Session parameters for one keygen run.

use crate::keygen::error::KeygenError;
use std::time::Duration;

/// Default Paillier modulus length in bits.
pub const DEFAULT_PAILLIER_KEY_LENGTH: usize = 2048;

const DEFAULT_SAFE_PRIME_CONCURRENCY: usize = 4;
const DEFAULT_SAFE_PRIME_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Group size, threshold and local identity of one participant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeygenParams {
    party_count: usize,
    threshold: usize,
    party_index: usize,
    paillier_key_length: usize,
    concurrency: usize,
    safe_prime_timeout: Duration,
}

impl KeygenParams {
    /// `threshold` is the number of shares needed to sign; any subset of
    /// that size can reconstruct, so `2 <= threshold <= party_count`.
    pub fn new(
        party_count: usize,
        threshold: usize,
        party_index: usize,
        paillier_key_length: usize,
    ) -> Result<Self, KeygenError> {
        if threshold < 2 || threshold > party_count {
            return Err(KeygenError::InvalidParameters(format!(
                "threshold {} out of range for {} parties",
                threshold, party_count
            )));
        }
        if party_index >= party_count {
            return Err(KeygenError::InvalidParameters(format!(
                "party index {} out of range for {} parties",
                party_index, party_count
            )));
        }
        if paillier_key_length < 16 || paillier_key_length % 4 != 0 {
            return Err(KeygenError::InvalidParameters(format!(
                "paillier key length {} is unusable",
                paillier_key_length
            )));
        }
        Ok(KeygenParams {
            party_count,
            threshold,
            party_index,
            paillier_key_length,
            concurrency: DEFAULT_SAFE_PRIME_CONCURRENCY,
            safe_prime_timeout: DEFAULT_SAFE_PRIME_TIMEOUT,
        })
    }

    pub fn party_count(&self) -> usize {
        self.party_count
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn party_index(&self) -> usize {
        self.party_index
    }

    pub fn paillier_key_length(&self) -> usize {
        self.paillier_key_length
    }

    /// Bit length of each safe prime behind N~ (and the Paillier modulus).
    pub fn safe_prime_bits(&self) -> usize {
        self.paillier_key_length / 2
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn safe_prime_timeout(&self) -> Duration {
        self.safe_prime_timeout
    }

    pub fn set_concurrency(mut self, concurrency: usize) -> Self {
        assert!(concurrency >= 1, "concurrency must be at least 1");
        self.concurrency = concurrency;
        self
    }

    pub fn set_safe_prime_timeout(mut self, timeout: Duration) -> Self {
        self.safe_prime_timeout = timeout;
        self
    }
}
