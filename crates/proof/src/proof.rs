//! Receipt inclusion proofs.

use crosslink_primitives::{hash::sha256, Buf32};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{ProofError, ProofResult},
    merkle::verify_merkle_path,
};

/// A claim that a raw receipt is committed under a block's receipts root.
///
/// Constructed per verification call and never persisted.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct ReceiptProof {
    block_hash: Buf32,
    receipts_root: Buf32,
    receipt_bytes: Vec<u8>,
    siblings: Vec<Buf32>,
    log_index: usize,
    leaf_index: u64,
}

impl ReceiptProof {
    pub fn new(
        block_hash: Buf32,
        receipts_root: Buf32,
        receipt_bytes: Vec<u8>,
        siblings: Vec<Buf32>,
        log_index: usize,
        leaf_index: u64,
    ) -> Self {
        Self {
            block_hash,
            receipts_root,
            receipt_bytes,
            siblings,
            log_index,
            leaf_index,
        }
    }

    /// Hash of the block whose receipts root this proof targets.
    pub fn block_hash(&self) -> &Buf32 {
        &self.block_hash
    }

    pub fn receipts_root(&self) -> &Buf32 {
        &self.receipts_root
    }

    pub fn receipt_bytes(&self) -> &[u8] {
        &self.receipt_bytes
    }

    pub fn log_index(&self) -> usize {
        self.log_index
    }

    pub fn leaf_index(&self) -> u64 {
        self.leaf_index
    }
}

/// Checks a receipt proof against the receipts root of the stored header the
/// proof references.
///
/// The header lookup itself happens at the service boundary; this function
/// only needs the root that lookup produced. The leaf is the content hash of
/// the raw receipt bytes.
pub fn verify_receipt_proof(proof: &ReceiptProof, header_root: &Buf32) -> ProofResult<()> {
    if proof.receipts_root != *header_root {
        return Err(ProofError::RootMismatch {
            claimed: proof.receipts_root,
            expected: *header_root,
        });
    }

    let leaf = sha256(&proof.receipt_bytes);
    if !verify_merkle_path(&leaf, &proof.siblings, proof.leaf_index, header_root) {
        return Err(ProofError::InclusionRejected {
            index: proof.leaf_index,
        });
    }

    Ok(())
}
