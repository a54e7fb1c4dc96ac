// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Fatal keygen errors with blame attribution.

use crate::common::safe_prime::SafePrimeError;
use crate::crypto::dlnproof::DlnError;
use crate::crypto::paillier::PaillierError;
use crate::crypto::schnorr::SchnorrError;
use crate::crypto::vss::VssError;
use thiserror::Error;

/// Every verification failure kills the session; where a specific peer's
/// artifact failed, the error names the culprit index.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeygenError {
    #[error("cryptographic rng returned no bytes")]
    RngFailure,
    #[error("malformed message: {0}")]
    MalformedMessage(String),
    #[error("commitment opening does not match (blame party {blame})")]
    CommitmentMismatch { blame: usize },
    #[error("vss share does not lie on the broadcast polynomial (blame party {blame})")]
    VssVerifyFail { blame: usize },
    #[error("ntilde range/equality or dln proof check failed (blame party {blame})")]
    NtildeCheckFail { blame: usize },
    #[error("schnorr proof of the partial secret failed (blame party {blame})")]
    SchnorrProofFail { blame: usize },
    #[error("share point does not match the aggregate polynomial (blame party {blame})")]
    BindingFail { blame: usize },
    #[error("share id is 0 modulo the order of the curve")]
    ShareIdInvalid,
    #[error("modular inverse undefined during share combination")]
    InverseFail,
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("keygen was already started")]
    AlreadyStarted,
    #[error("session is aborted")]
    Aborted,
    #[error("output channel closed")]
    ChannelClosed,
    #[error("prime generation failed: {0}")]
    PrimeGeneration(String),
}

impl KeygenError {
    /// The party this failure is attributed to, when one exists.
    pub fn blame(&self) -> Option<usize> {
        match self {
            KeygenError::CommitmentMismatch { blame }
            | KeygenError::VssVerifyFail { blame }
            | KeygenError::NtildeCheckFail { blame }
            | KeygenError::SchnorrProofFail { blame }
            | KeygenError::BindingFail { blame } => Some(*blame),
            _ => None,
        }
    }
}

impl From<VssError> for KeygenError {
    fn from(e: VssError) -> Self {
        match e {
            VssError::ShareIdZero => KeygenError::ShareIdInvalid,
            VssError::InverseFail => KeygenError::InverseFail,
            VssError::Rng => KeygenError::RngFailure,
            VssError::InvalidParameters(s) => KeygenError::InvalidParameters(s),
        }
    }
}

impl From<SchnorrError> for KeygenError {
    fn from(e: SchnorrError) -> Self {
        match e {
            SchnorrError::Rng => KeygenError::RngFailure,
            SchnorrError::InvalidParameters(s) => KeygenError::InvalidParameters(s),
        }
    }
}

impl From<DlnError> for KeygenError {
    fn from(e: DlnError) -> Self {
        match e {
            DlnError::Rng => KeygenError::RngFailure,
            DlnError::InvalidParameters(s) => KeygenError::InvalidParameters(s),
        }
    }
}

impl From<SafePrimeError> for KeygenError {
    fn from(e: SafePrimeError) -> Self {
        KeygenError::PrimeGeneration(e.to_string())
    }
}

impl From<PaillierError> for KeygenError {
    fn from(e: PaillierError) -> Self {
        match e {
            PaillierError::Rng => KeygenError::RngFailure,
            other => KeygenError::PrimeGeneration(other.to_string()),
        }
    }
}

/// Recorded when the state machine transitions to its aborted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abort {
    /// Round the failure surfaced in.
    pub round: u8,
    /// Culprit index, when the failure is attributable.
    pub blame: Option<usize>,
    pub cause: KeygenError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blame_extraction() {
        assert_eq!(KeygenError::VssVerifyFail { blame: 3 }.blame(), Some(3));
        assert_eq!(KeygenError::NtildeCheckFail { blame: 0 }.blame(), Some(0));
        assert_eq!(KeygenError::RngFailure.blame(), None);
        assert_eq!(KeygenError::InverseFail.blame(), None);
    }

    #[test]
    fn vss_error_mapping() {
        assert_eq!(
            KeygenError::from(VssError::ShareIdZero),
            KeygenError::ShareIdInvalid
        );
        assert_eq!(
            KeygenError::from(VssError::InverseFail),
            KeygenError::InverseFail
        );
    }
}
