//! External capability seams: the price oracle and the collateral bank.

use crosslink_primitives::AccountId;
use thiserror::Error;

/// A price observation from the external feed.
///
/// The price is USD per native unit in fixed-point
/// [`PRICE_SCALE`](crosslink_params::PRICE_SCALE) units. It is signed because
/// the feed contract reports a signed integer; callers must reject anything
/// that is not strictly positive.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PriceQuote {
    pub price: i128,
    pub updated_at: u64,
}

#[derive(Debug, Error)]
#[error("price feed unavailable: {0}")]
pub struct OracleError(pub String);

/// Source of USD valuations for staked collateral.
pub trait PriceOracle: Send + Sync {
    /// Returns the latest observed price.
    fn latest_price(&self) -> Result<PriceQuote, OracleError>;
}

/// Fixed-price oracle for tests and local deployments.
#[derive(Copy, Clone, Debug)]
pub struct StaticPriceOracle {
    quote: PriceQuote,
}

impl StaticPriceOracle {
    pub fn new(price: i128, updated_at: u64) -> Self {
        Self {
            quote: PriceQuote { price, updated_at },
        }
    }
}

impl PriceOracle for StaticPriceOracle {
    fn latest_price(&self) -> Result<PriceQuote, OracleError> {
        Ok(self.quote)
    }
}

#[derive(Debug, Error)]
#[error("transfer to {account} for {amount} rejected: {reason}")]
pub struct TransferError {
    pub account: AccountId,
    pub amount: u128,
    pub reason: String,
}

/// Destination for withdrawn collateral.
///
/// Crediting must be atomic with the registry's stake debit: the registry
/// only zeroes stake after `credit` returns `Ok`, so a failed transfer leaves
/// the validator record untouched.
pub trait CollateralBank: Send + Sync {
    fn credit(&self, account: AccountId, amount: u128) -> Result<(), TransferError>;
}

/// Bank that accepts every credit. Used where the hosting platform performs
/// the actual value transfer after observing the withdrawal event.
#[derive(Copy, Clone, Debug, Default)]
pub struct AcceptingBank;

impl CollateralBank for AcceptingBank {
    fn credit(&self, _account: AccountId, _amount: u128) -> Result<(), TransferError> {
        Ok(())
    }
}
