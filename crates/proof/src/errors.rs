//! Error types used by receipt proof verification.

use crosslink_primitives::{Buf32, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProofError {
    /// The claimed receipts root does not match the stored header's root.
    #[error("claimed receipts root {claimed} does not match header root {expected}")]
    RootMismatch { claimed: Buf32, expected: Buf32 },

    /// The sibling path does not connect the receipt leaf to the root.
    #[error("merkle inclusion check failed at leaf index {index}")]
    InclusionRejected { index: u64 },

    /// The receipt payload is not an RLP list.
    #[error("receipt payload is not a list")]
    NotAList,

    /// The receipt list has fewer fields than the expected shape.
    #[error("receipt has {fields} fields, expected at least {expected}")]
    TruncatedReceipt { fields: usize, expected: usize },

    /// The requested log index is past the end of the receipt's log list.
    #[error("log index {index} out of bounds for {count} logs")]
    LogIndexOutOfBounds { index: usize, count: usize },

    /// The receipt bytes failed RLP decoding.
    #[error("receipt decode failed: {0}")]
    Decode(#[from] rlp::DecoderError),
}

impl ProofError {
    /// Coarse classification of this rejection.
    pub fn kind(&self) -> ErrorKind {
        // Every proof failure is a malformed or non-member input.
        ErrorKind::Validation
    }
}

pub type ProofResult<T> = Result<T, ProofError>;
