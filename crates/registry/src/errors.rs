//! Error types used by the registry.

use crosslink_primitives::{AccountId, ErrorKind};
use thiserror::Error;

use crate::oracle::{OracleError, TransferError};

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Public key material is not exactly the aggregate-key length.
    #[error("pubkey length {0} is not the aggregate key length")]
    PubkeyLength(usize),

    /// The account already holds nonzero stake.
    #[error("account {0} already registered with nonzero stake")]
    AlreadyRegistered(AccountId),

    /// The public key is already bound to another identity.
    #[error("pubkey already bound to {0}")]
    PubkeyInUse(AccountId),

    /// The account has no validator record.
    #[error("account {0} is not a registered validator")]
    NotRegistered(AccountId),

    /// The validator is not in the active set.
    #[error("validator {0} is not active")]
    NotActive(AccountId),

    /// The validator is jailed until the given timestamp.
    #[error("validator {0} is jailed until {1}")]
    Jailed(AccountId, u64),

    /// Heartbeat submitted for an epoch other than the current one.
    #[error("heartbeat for epoch {submitted}, current epoch is {current}")]
    EpochMismatch { submitted: u64, current: u64 },

    /// The validator already submitted a heartbeat for this epoch.
    #[error("duplicate heartbeat from {account} for epoch {epoch}")]
    DuplicateHeartbeat { account: AccountId, epoch: u64 },

    /// Collateral is below the USD floor.
    #[error("stake worth {usd_value} USD units is below the floor of {min}")]
    StakeBelowMinimum { usd_value: u128, min: u128 },

    /// The oracle returned a price that is not strictly positive.
    #[error("oracle price {0} is not strictly positive")]
    NonPositivePrice(i128),

    /// Stake valuation overflowed the accounting width.
    #[error("stake valuation overflow")]
    ValuationOverflow,

    /// The validator is still active and cannot withdraw.
    #[error("validator {0} is still active")]
    StillActive(AccountId),

    /// Unbonding was never started.
    #[error("validator {0} has not started unbonding")]
    NotUnbonding(AccountId),

    /// The unbonding period has not elapsed yet.
    #[error("unbonding for {account} completes at {completes_at}, now is {now}")]
    UnbondingNotComplete {
        account: AccountId,
        completes_at: u64,
        now: u64,
    },

    /// There is no remaining stake to withdraw.
    #[error("validator {0} has no stake to withdraw")]
    NothingToWithdraw(AccountId),

    /// The price oracle could not be consulted.
    #[error("oracle: {0}")]
    Oracle(#[from] OracleError),

    /// The outbound collateral transfer failed; no stake was debited.
    #[error("collateral transfer: {0}")]
    Transfer(#[from] TransferError),
}

impl RegistryError {
    /// Coarse classification of this rejection.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PubkeyLength(_) | Self::EpochMismatch { .. } | Self::ValuationOverflow => {
                ErrorKind::Validation
            }
            Self::NotRegistered(_) | Self::NotActive(_) | Self::Jailed(..) => {
                ErrorKind::Authorization
            }
            Self::AlreadyRegistered(_)
            | Self::PubkeyInUse(_)
            | Self::DuplicateHeartbeat { .. }
            | Self::StillActive(_)
            | Self::NotUnbonding(_)
            | Self::UnbondingNotComplete { .. }
            | Self::NothingToWithdraw(_) => ErrorKind::StateConflict,
            Self::StakeBelowMinimum { .. }
            | Self::NonPositivePrice(_)
            | Self::Oracle(_)
            | Self::Transfer(_) => ErrorKind::Economic,
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;
