//! Header and attestation types.

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use crosslink_primitives::{Buf32, Buf96};
use serde::{Deserialize, Serialize};

/// A foreign-chain block header as submitted to the light client.
#[derive(
    Clone, Debug, Eq, PartialEq, Arbitrary, BorshDeserialize, BorshSerialize, Deserialize, Serialize,
)]
pub struct BlockHeader {
    hash: Buf32,
    parent_hash: Buf32,
    receipts_root: Buf32,
    state_root: Buf32,
    number: u64,
    timestamp: u64,
    difficulty: u128,
}

impl BlockHeader {
    #[allow(clippy::too_many_arguments, reason = "mirrors the submission surface")]
    pub fn new(
        hash: Buf32,
        parent_hash: Buf32,
        receipts_root: Buf32,
        state_root: Buf32,
        number: u64,
        timestamp: u64,
        difficulty: u128,
    ) -> Self {
        Self {
            hash,
            parent_hash,
            receipts_root,
            state_root,
            number,
            timestamp,
            difficulty,
        }
    }

    pub fn hash(&self) -> &Buf32 {
        &self.hash
    }

    pub fn parent_hash(&self) -> &Buf32 {
        &self.parent_hash
    }

    pub fn receipts_root(&self) -> &Buf32 {
        &self.receipts_root
    }

    pub fn state_root(&self) -> &Buf32 {
        &self.state_root
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn difficulty(&self) -> u128 {
        self.difficulty
    }
}

/// Aggregate attestation material accompanying a header submission.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Arbitrary,
    BorshDeserialize,
    BorshSerialize,
    Deserialize,
    Serialize,
)]
pub struct HeaderAttestation {
    signature: Buf96,
    signers_bitmap: u64,
}

impl HeaderAttestation {
    pub fn new(signature: Buf96, signers_bitmap: u64) -> Self {
        Self {
            signature,
            signers_bitmap,
        }
    }

    pub fn signature(&self) -> &Buf96 {
        &self.signature
    }

    /// Bitmap of which registered submitters contributed to the aggregate.
    pub fn signers_bitmap(&self) -> u64 {
        self.signers_bitmap
    }
}

/// A header as stored, with its verification flag.
///
/// Every stored header passed the submission checks; `verified` records
/// whether it is part of the finalized canonical chain. Headers submitted
/// ahead of the tip stay unverified until a resubmission finalizes them.
#[derive(Clone, Debug, Eq, PartialEq, BorshDeserialize, BorshSerialize, Deserialize, Serialize)]
pub struct StoredHeader {
    pub(crate) header: BlockHeader,
    pub(crate) verified: bool,
}

impl StoredHeader {
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    /// Whether the header has been finalized into the canonical chain.
    pub fn is_verified(&self) -> bool {
        self.verified
    }
}
