//! Domain events emitted by registry mutations.
//!
//! These are the only channel by which external observers learn of registry
//! state changes; every mutating operation returns the events it produced.

use crosslink_primitives::AccountId;

use crate::types::SlashReason;

/// A registry state change worth notifying observers about.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RegistryEvent {
    ValidatorRegistered {
        account: AccountId,
        stake: u128,
    },

    HeartbeatReceived {
        account: AccountId,
        epoch: u64,
    },

    PerformanceUpdated {
        account: AccountId,
        score: u32,
    },

    ValidatorSlashed {
        account: AccountId,
        amount: u128,
        reason: SlashReason,
    },

    ValidatorJailed {
        account: AccountId,
        until: u64,
    },

    /// Stake fell below the USD floor and the validator left the active set.
    ValidatorDeactivated {
        account: AccountId,
    },

    UnbondingStarted {
        account: AccountId,
        completes_at: u64,
    },

    StakeWithdrawn {
        account: AccountId,
        amount: u128,
    },

    EpochAdvanced {
        epoch: u64,
    },
}
