//! Unified event stream over all bridge components.

use crosslink_light_client::ClientEvent;
use crosslink_primitives::Buf32;
use crosslink_registry::RegistryEvent;

/// A bridge-wide notification, fanned out to every subscriber.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BridgeEvent {
    Registry(RegistryEvent),
    Client(ClientEvent),

    /// A verified cross-chain transfer was recorded in the relay ledger.
    TransferRecorded { source_tx: Buf32 },
}

impl From<RegistryEvent> for BridgeEvent {
    fn from(event: RegistryEvent) -> Self {
        Self::Registry(event)
    }
}

impl From<ClientEvent> for BridgeEvent {
    fn from(event: ClientEvent) -> Self {
        Self::Client(event)
    }
}
