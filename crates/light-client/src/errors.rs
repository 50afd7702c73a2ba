//! Error types used by the light client.

use crosslink_primitives::{AccountId, Buf32, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The submitted header hash is the zero value.
    #[error("header hash is zero")]
    ZeroHash,

    /// The header does not extend past the finalized tip.
    #[error("header number {number} does not exceed finalized {finalized}")]
    NotAboveFinalized { number: u64, finalized: u64 },

    /// The claimed difficulty is below the configured floor.
    #[error("difficulty {difficulty} below floor {floor}")]
    DifficultyBelowFloor { difficulty: u128, floor: u128 },

    /// The difficulty validator rejected the claimed work value.
    #[error("difficulty {current} out of band for parent {parent}")]
    DifficultyOutOfBand { parent: u128, current: u128 },

    /// The parent hash does not match the canonical hash at number - 1.
    #[error("parent hash mismatch at number {number}")]
    ParentMismatch { number: u64, expected: Buf32 },

    /// The attestation failed signature verification.
    #[error("header attestation rejected")]
    AttestationRejected,

    /// Range query bounds are inverted.
    #[error("range start {from} exceeds end {to}")]
    InvertedRange { from: u64, to: u64 },

    /// Range query reaches past the finalized tip.
    #[error("range end {to} exceeds finalized {finalized}")]
    RangeBeyondFinalized { to: u64, finalized: u64 },

    /// The account is not a registered submitter.
    #[error("account {0} is not a registered submitter")]
    UnknownSubmitter(AccountId),

    /// The account is already a registered submitter.
    #[error("account {0} is already a submitter")]
    DuplicateSubmitter(AccountId),

    /// The requested threshold exceeds the submitter count.
    #[error("threshold {threshold} exceeds submitter count {submitters}")]
    ThresholdTooHigh { threshold: u32, submitters: u32 },
}

impl ClientError {
    /// Coarse classification of this rejection.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroHash
            | Self::NotAboveFinalized { .. }
            | Self::DifficultyBelowFloor { .. }
            | Self::DifficultyOutOfBand { .. }
            | Self::ParentMismatch { .. }
            | Self::InvertedRange { .. }
            | Self::RangeBeyondFinalized { .. } => ErrorKind::Validation,
            Self::AttestationRejected | Self::UnknownSubmitter(_) => ErrorKind::Authorization,
            Self::DuplicateSubmitter(_) | Self::ThresholdTooHigh { .. } => {
                ErrorKind::StateConflict
            }
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
