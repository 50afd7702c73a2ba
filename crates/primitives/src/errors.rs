//! Shared error classification.

use std::fmt;

/// Coarse classification of rejection causes, shared by every component.
///
/// All rejections are local, synchronous, and non-retryable: the caller must
/// correct the request and resubmit. No rejection leaves partially-applied
/// state behind.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Malformed input (zero hashes, wrong-length keys, out-of-range indices,
    /// malformed receipt structure).
    Validation,

    /// Caller lacks the role the operation requires, or is jailed.
    Authorization,

    /// The request conflicts with current state (duplicate registration or
    /// heartbeat, premature withdrawal, threshold exceeding set size).
    StateConflict,

    /// Stake below the USD floor or a non-positive oracle price.
    Economic,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::StateConflict => "state conflict",
            Self::Economic => "economic",
        };
        f.write_str(s)
    }
}
