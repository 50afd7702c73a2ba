//! Validator records and the slash log.

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use crosslink_params::{
    MAX_SCORE, SCORE_PENALTY_PER_MISS, SCORE_PENALTY_PER_SLASH_STEP, SLASH_SCORE_STEP,
};
use crosslink_primitives::{AccountId, Buf48};
use serde::{Deserialize, Serialize};

/// Why a validator's stake was reduced.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Arbitrary,
    BorshDeserialize,
    BorshSerialize,
    Deserialize,
    Serialize,
)]
pub enum SlashReason {
    /// Provable equivocation on attested events.
    DoubleSign,

    /// Missed-liveness penalty, reported or derived from epoch accounting.
    Offline,
}

/// Immutable record of a single slash, indexed by a monotonically increasing
/// sequence number within the registry's append-only log.
#[derive(
    Clone, Debug, Eq, PartialEq, Arbitrary, BorshDeserialize, BorshSerialize, Deserialize, Serialize,
)]
pub struct SlashEvent {
    seq: u64,
    account: AccountId,
    amount: u128,
    reason: SlashReason,
    timestamp: u64,
}

impl SlashEvent {
    pub fn new(seq: u64, account: AccountId, amount: u128, reason: SlashReason, timestamp: u64) -> Self {
        Self {
            seq,
            account,
            amount,
            reason,
            timestamp,
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn amount(&self) -> u128 {
        self.amount
    }

    pub fn reason(&self) -> SlashReason {
        self.reason
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

/// A staked bridge participant.
///
/// Timestamps are unix seconds; a value of zero means "never set". Stake is
/// denominated in the smallest native unit.
#[derive(
    Clone, Debug, Eq, PartialEq, Arbitrary, BorshDeserialize, BorshSerialize, Deserialize, Serialize,
)]
pub struct Validator {
    pub(crate) account: AccountId,
    pub(crate) pubkey: Buf48,
    pub(crate) stake: u128,
    pub(crate) last_heartbeat_ts: u64,
    pub(crate) jailed_until: u64,
    pub(crate) unbonding_completes_at: u64,
    pub(crate) total_slashed: u128,
    pub(crate) active: bool,
    pub(crate) missed_heartbeats: u32,
    pub(crate) score: u32,
    /// Epoch of the most recent accepted heartbeat. The per-epoch presence
    /// map only ever gets queried for the current or just-closed epoch, so
    /// keeping the latest entry is equivalent to keeping them all.
    pub(crate) last_heartbeat_epoch: Option<u64>,
}

impl Validator {
    pub(crate) fn new(account: AccountId, pubkey: Buf48, stake: u128) -> Self {
        Self {
            account,
            pubkey,
            stake,
            last_heartbeat_ts: 0,
            jailed_until: 0,
            unbonding_completes_at: 0,
            total_slashed: 0,
            active: true,
            missed_heartbeats: 0,
            score: MAX_SCORE,
            last_heartbeat_epoch: None,
        }
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn pubkey(&self) -> &Buf48 {
        &self.pubkey
    }

    pub fn stake(&self) -> u128 {
        self.stake
    }

    pub fn total_slashed(&self) -> u128 {
        self.total_slashed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Checks whether the validator is jailed as of `now`. Jail expiry is
    /// purely a timestamp comparison; nothing clears the field.
    pub fn is_jailed(&self, now: u64) -> bool {
        now < self.jailed_until
    }

    pub fn jailed_until(&self) -> u64 {
        self.jailed_until
    }

    pub fn unbonding_completes_at(&self) -> u64 {
        self.unbonding_completes_at
    }

    pub fn missed_heartbeats(&self) -> u32 {
        self.missed_heartbeats
    }

    pub fn last_heartbeat_ts(&self) -> u64 {
        self.last_heartbeat_ts
    }

    /// Performance score in basis points (0..=10000).
    pub fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn recompute_score(&mut self) {
        self.score = compute_score(self.missed_heartbeats, self.total_slashed);
    }
}

/// Deterministic performance score: start at the maximum, subtract 1000 per
/// currently-missed heartbeat and 100 per 0.1 native unit of cumulative
/// slashed stake, never going below zero.
pub(crate) fn compute_score(missed_heartbeats: u32, total_slashed: u128) -> u32 {
    let miss_penalty = missed_heartbeats.saturating_mul(SCORE_PENALTY_PER_MISS);
    let slash_steps = (total_slashed / SLASH_SCORE_STEP).min(u128::from(u32::MAX)) as u32;
    let slash_penalty = slash_steps.saturating_mul(SCORE_PENALTY_PER_SLASH_STEP);
    MAX_SCORE
        .saturating_sub(miss_penalty)
        .saturating_sub(slash_penalty)
}
