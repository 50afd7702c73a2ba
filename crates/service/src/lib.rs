//! Bridge verification service.
//!
//! Composes the validator registry, the header light client, the receipt
//! proof verifier, and the relay ledger behind one authorized surface, and
//! fans domain events out to subscribers.

mod clock;
mod config;
mod errors;
mod events;
mod ledger;
mod logging;
mod service;

pub use clock::{Clock, SystemClock};
pub use config::{ConfigError, ServiceConfig};
pub use errors::{ServiceError, ServiceResult};
pub use events::BridgeEvent;
pub use ledger::RelayLedger;
pub use logging::init as init_logging;
pub use service::{BridgeService, Collaborators};
