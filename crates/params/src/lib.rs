//! Protocol parameters for the bridge verification core.
//!
//! These are the economic and consensus constants every component consults.
//! They are chosen at deployment and never change at runtime, except where a
//! component exposes an explicit governance operation (e.g. the strict
//! difficulty toggle on the light client).

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Fixed-point scale of oracle USD prices (8 decimals, so 1 USD = 10^8).
pub const PRICE_SCALE: u128 = 100_000_000;

/// Smallest accounting unit of the native staking currency (wei-style,
/// 18 decimals).
pub const NATIVE_UNIT: u128 = 1_000_000_000_000_000_000;

/// Maximum validator performance score, in basis points.
pub const MAX_SCORE: u32 = 10_000;

/// Score penalty per currently-missed heartbeat.
pub const SCORE_PENALTY_PER_MISS: u32 = 1_000;

/// Score penalty per 0.1 native unit of cumulative slashed stake.
pub const SCORE_PENALTY_PER_SLASH_STEP: u32 = 100;

/// Slashed-amount granularity for scoring: 0.1 native unit.
pub const SLASH_SCORE_STEP: u128 = NATIVE_UNIT / 10;

/// Divisor for the per-block difficulty adjustment band (one 2^11 step).
pub const DIFFICULTY_BOUND_DIVISOR: u128 = 2_048;

/// Difficulty at or below which a chain is treated as authority-based.
pub const AUTHORITY_DIFFICULTY_MAX: u128 = 2;

/// Default minimum stake, in oracle fixed-point USD: one million USD.
const DEFAULT_MIN_STAKE_USD: u128 = 1_000_000 * PRICE_SCALE;

/// Default double-sign slash fraction, in basis points.
const DEFAULT_DOUBLE_SIGN_SLASH_BPS: u32 = 500;

/// Default offline slash fraction, in basis points.
const DEFAULT_OFFLINE_SLASH_BPS: u32 = 100;

/// Default jail duration: 72 hours.
const DEFAULT_JAIL_DURATION_SECS: u64 = 72 * 60 * 60;

/// Default unbonding period: 21 days.
const DEFAULT_UNBONDING_PERIOD_SECS: u64 = 21 * 24 * 60 * 60;

/// Default consecutive-miss count that triggers an offline auto-slash.
const DEFAULT_MAX_MISSED_HEARTBEATS: u32 = 2;

/// Default difficulty floor for submitted headers.
const DEFAULT_MIN_DIFFICULTY: u128 = 1;

/// Default block gap beyond which difficulty validation is skipped.
const DEFAULT_MAX_DIFFICULTY_GAP: u64 = 100;

/// Deployment-time protocol parameters.
#[derive(Clone, Debug, Eq, PartialEq, BorshDeserialize, BorshSerialize, Deserialize, Serialize)]
pub struct ProtocolParams {
    /// Minimum USD-denominated stake required to register, in oracle
    /// fixed-point units.
    #[serde(default = "default_min_stake_usd")]
    pub min_stake_usd: u128,

    /// Stake fraction removed on a double-sign slash, in basis points.
    #[serde(default = "default_double_sign_slash_bps")]
    pub double_sign_slash_bps: u32,

    /// Stake fraction removed on an offline slash, in basis points.
    #[serde(default = "default_offline_slash_bps")]
    pub offline_slash_bps: u32,

    /// How long a double-sign slash jails the validator, in seconds.
    #[serde(default = "default_jail_duration_secs")]
    pub jail_duration_secs: u64,

    /// Delay between unbonding start and withdrawal eligibility, in seconds.
    #[serde(default = "default_unbonding_period_secs")]
    pub unbonding_period_secs: u64,

    /// Consecutive missed heartbeats at which the offline auto-slash fires.
    #[serde(default = "default_max_missed_heartbeats")]
    pub max_missed_heartbeats: u32,

    /// Headers with a difficulty below this floor are rejected outright.
    #[serde(default = "default_min_difficulty")]
    pub min_difficulty: u128,

    /// Block gap beyond which difficulty validation is skipped, to allow
    /// trust bootstrapping across long gaps.
    #[serde(default = "default_max_difficulty_gap")]
    pub max_difficulty_gap: u64,

    /// Whether the light client applies the difficulty validator at all.
    #[serde(default = "default_strict_difficulty")]
    pub strict_difficulty: bool,
}

impl ProtocolParams {
    /// Converts a native stake amount into oracle fixed-point USD, given the
    /// oracle price for one native unit. Floor division; `None` on overflow.
    pub fn usd_value(&self, stake: u128, price: u128) -> Option<u128> {
        stake.checked_mul(price).map(|v| v / NATIVE_UNIT)
    }

    /// Checks whether a native stake amount meets the USD floor at the given
    /// price. The boundary is inclusive.
    pub fn meets_stake_floor(&self, stake: u128, price: u128) -> bool {
        self.usd_value(stake, price)
            .is_some_and(|usd| usd >= self.min_stake_usd)
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            min_stake_usd: DEFAULT_MIN_STAKE_USD,
            double_sign_slash_bps: DEFAULT_DOUBLE_SIGN_SLASH_BPS,
            offline_slash_bps: DEFAULT_OFFLINE_SLASH_BPS,
            jail_duration_secs: DEFAULT_JAIL_DURATION_SECS,
            unbonding_period_secs: DEFAULT_UNBONDING_PERIOD_SECS,
            max_missed_heartbeats: DEFAULT_MAX_MISSED_HEARTBEATS,
            min_difficulty: DEFAULT_MIN_DIFFICULTY,
            max_difficulty_gap: DEFAULT_MAX_DIFFICULTY_GAP,
            strict_difficulty: true,
        }
    }
}

fn default_min_stake_usd() -> u128 {
    DEFAULT_MIN_STAKE_USD
}

fn default_double_sign_slash_bps() -> u32 {
    DEFAULT_DOUBLE_SIGN_SLASH_BPS
}

fn default_offline_slash_bps() -> u32 {
    DEFAULT_OFFLINE_SLASH_BPS
}

fn default_jail_duration_secs() -> u64 {
    DEFAULT_JAIL_DURATION_SECS
}

fn default_unbonding_period_secs() -> u64 {
    DEFAULT_UNBONDING_PERIOD_SECS
}

fn default_max_missed_heartbeats() -> u32 {
    DEFAULT_MAX_MISSED_HEARTBEATS
}

fn default_min_difficulty() -> u128 {
    DEFAULT_MIN_DIFFICULTY
}

fn default_max_difficulty_gap() -> u64 {
    DEFAULT_MAX_DIFFICULTY_GAP
}

fn default_strict_difficulty() -> bool {
    true
}
