//! Replay protection for relayed transfers.

use std::collections::HashSet;

use crosslink_primitives::Buf32;

/// Tracks which source-chain transactions have already been relayed, so a
/// verified receipt can only ever be acted on once.
#[derive(Debug, Default)]
pub struct RelayLedger {
    processed: HashSet<Buf32>,
}

impl RelayLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processed(&self, source_tx: &Buf32) -> bool {
        self.processed.contains(source_tx)
    }

    /// Marks the source transaction processed. Returns false if it already
    /// was, leaving the ledger unchanged.
    pub fn record(&mut self, source_tx: Buf32) -> bool {
        self.processed.insert(source_tx)
    }

    pub fn len(&self) -> usize {
        self.processed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }
}
