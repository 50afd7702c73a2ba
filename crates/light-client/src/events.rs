//! Domain events emitted by light client mutations.

use crosslink_primitives::{AccountId, Buf32};

/// A light client state change worth notifying observers about.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClientEvent {
    HeaderSubmitted {
        hash: Buf32,
        number: u64,
    },

    /// The header became part of the canonical finalized chain.
    HeaderFinalized {
        hash: Buf32,
        number: u64,
    },

    SubmitterAdded {
        account: AccountId,
    },

    SubmitterRemoved {
        account: AccountId,
    },

    ThresholdUpdated {
        threshold: u32,
    },

    StrictDifficultyUpdated {
        enabled: bool,
    },
}
