//! Fixed-size byte buffers.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Length in bytes of an aggregate public key.
pub const AGG_KEY_LEN: usize = 48;

/// Length in bytes of an aggregate signature.
pub const AGG_SIG_LEN: usize = 96;

/// A 32-byte buffer, used for hashes and identifiers.
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Default,
    BorshDeserialize,
    BorshSerialize,
    Deserialize,
    Serialize,
)]
pub struct Buf32(#[serde(with = "hex::serde")] [u8; 32]);

impl_buf_common!(Buf32, 32);

/// A 48-byte buffer, used for aggregate public key material.
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    BorshDeserialize,
    BorshSerialize,
    Deserialize,
    Serialize,
)]
pub struct Buf48(#[serde(with = "hex::serde")] [u8; AGG_KEY_LEN]);

impl_buf_common!(Buf48, 48);

/// A 96-byte buffer, used for aggregate signature material.
#[derive(Copy, Clone, Eq, PartialEq, BorshDeserialize, BorshSerialize, Deserialize, Serialize)]
pub struct Buf96(#[serde(with = "hex::serde")] [u8; AGG_SIG_LEN]);

impl_buf_common!(Buf96, 96);

impl Default for Buf48 {
    fn default() -> Self {
        Self::zero()
    }
}

impl Default for Buf96 {
    fn default() -> Self {
        Self::zero()
    }
}
