//! Receipt proof verification.
//!
//! Checks that a raw receipt is committed under a block's receipts root via
//! a bottom-up Merkle inclusion proof, and extracts individual logs from the
//! RLP-encoded receipt body.

mod errors;
mod merkle;
mod proof;
mod receipt;

pub use errors::{ProofError, ProofResult};
pub use merkle::verify_merkle_path;
pub use proof::{verify_receipt_proof, ReceiptProof};
pub use receipt::{decode_receipt, extract_log, LogEntry, Receipt, RECEIPT_FIELD_COUNT};
