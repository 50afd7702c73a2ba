//! Account identifier type.

use std::fmt;

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::buf::Buf32;

/// Universal account identifier for bridge participants.
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    BorshDeserialize,
    BorshSerialize,
    Deserialize,
    Serialize,
)]
pub struct AccountId(Buf32);

impl AccountId {
    pub const fn new(inner: Buf32) -> Self {
        Self(inner)
    }

    /// The "zero" account ID.
    pub const fn zero() -> Self {
        Self(Buf32::zero())
    }

    /// Checks if this is the zero account ID.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn inner(&self) -> &Buf32 {
        &self.0
    }

    pub fn into_inner(self) -> Buf32 {
        self.0
    }
}

impl From<Buf32> for AccountId {
    fn from(value: Buf32) -> Self {
        Self(value)
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(value: [u8; 32]) -> Self {
        Self(Buf32::new(value))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}
