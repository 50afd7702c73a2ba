//! Light client for the foreign source chain.
//!
//! Stores submitted block headers, enforces parent-hash continuity and the
//! difficulty rules, and advances a strictly sequential canonical chain.
//! There is no fork choice: a canonical entry is never replaced, and headers
//! that do not directly extend the finalized tip are stored without
//! finalizing anything.

mod client;
mod difficulty;
mod errors;
mod events;
mod types;
mod verifier;

pub use client::HeaderLightClient;
pub use difficulty::validate_difficulty;
pub use errors::{ClientError, ClientResult};
pub use events::ClientEvent;
pub use types::{BlockHeader, HeaderAttestation, StoredHeader};
pub use verifier::{MaterialPresenceVerifier, SignatureVerifier};
