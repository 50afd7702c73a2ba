//! Validator registry: staked-collateral accounting, epoch liveness,
//! slashing, jailing, and unbonding for bridge attestors.
//!
//! The registry exclusively owns validator and slash-log state. Cross-chain
//! misbehavior reports arrive only through the slash operation; liveness
//! penalties are derived internally when an epoch closes.

mod errors;
mod events;
mod oracle;
mod registry;
mod types;

pub use errors::{RegistryError, RegistryResult};
pub use events::RegistryEvent;
pub use oracle::{
    AcceptingBank, CollateralBank, OracleError, PriceOracle, PriceQuote, StaticPriceOracle,
    TransferError,
};
pub use registry::ValidatorRegistry;
pub use types::{SlashEvent, SlashReason, Validator};
