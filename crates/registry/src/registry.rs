//! Registry state and its mutating operations.

use std::{collections::HashMap, sync::Arc};

use crosslink_params::ProtocolParams;
use crosslink_primitives::{AccountId, Buf48};
use tracing::{debug, info, warn};

use crate::{
    errors::{RegistryError, RegistryResult},
    events::RegistryEvent,
    oracle::{CollateralBank, PriceOracle},
    types::{SlashEvent, SlashReason, Validator},
};

/// Basis-point denominator for slash fractions.
const BPS_DENOM: u128 = 10_000;

/// Exact `stake * bps / 10_000` without intermediate overflow, so the full
/// u128 stake range the register path accepts stays slashable.
fn slash_amount(stake: u128, bps: u32) -> u128 {
    let bps = u128::from(bps);
    (stake / BPS_DENOM) * bps + (stake % BPS_DENOM) * bps / BPS_DENOM
}

/// Registry of staked validators.
///
/// Every mutating operation either fully applies its effects or applies
/// none: all rejections are raised before the first write. The caller is
/// responsible for serializing mutations (see the service crate).
pub struct ValidatorRegistry {
    params: ProtocolParams,
    validators: HashMap<AccountId, Validator>,
    /// Dense index of active validators. Removal is swap-remove; order is
    /// not an API guarantee.
    active_set: Vec<AccountId>,
    pubkey_index: HashMap<Buf48, AccountId>,
    slash_log: Vec<SlashEvent>,
    current_epoch: u64,
    oracle: Arc<dyn PriceOracle>,
    bank: Arc<dyn CollateralBank>,
}

impl ValidatorRegistry {
    pub fn new(
        params: ProtocolParams,
        oracle: Arc<dyn PriceOracle>,
        bank: Arc<dyn CollateralBank>,
    ) -> Self {
        Self {
            params,
            validators: HashMap::new(),
            active_set: Vec::new(),
            pubkey_index: HashMap::new(),
            slash_log: Vec::new(),
            current_epoch: 0,
            oracle,
            bank,
        }
    }

    /// Registers a new validator with the given aggregate public key and
    /// native-denominated collateral.
    pub fn register(
        &mut self,
        account: AccountId,
        pubkey: &[u8],
        collateral: u128,
        now: u64,
    ) -> RegistryResult<Vec<RegistryEvent>> {
        let pubkey = Buf48::try_from(pubkey).map_err(RegistryError::PubkeyLength)?;

        // A record may linger after full withdrawal; only nonzero stake
        // blocks re-registration.
        if let Some(existing) = self.validators.get(&account) {
            if existing.stake > 0 {
                return Err(RegistryError::AlreadyRegistered(account));
            }
        }

        if let Some(holder) = self.pubkey_index.get(&pubkey) {
            if *holder != account {
                return Err(RegistryError::PubkeyInUse(*holder));
            }
        }

        let price = self.positive_price()?;
        let usd_value = self
            .params
            .usd_value(collateral, price)
            .ok_or(RegistryError::ValuationOverflow)?;
        if usd_value < self.params.min_stake_usd {
            return Err(RegistryError::StakeBelowMinimum {
                usd_value,
                min: self.params.min_stake_usd,
            });
        }

        // Drop the stale pubkey binding of a withdrawn record being replaced.
        if let Some(old) = self.validators.remove(&account) {
            self.pubkey_index.remove(&old.pubkey);
        }

        let mut validator = Validator::new(account, pubkey, collateral);
        validator.last_heartbeat_ts = now;
        self.validators.insert(account, validator);
        self.pubkey_index.insert(pubkey, account);
        self.active_set.push(account);

        info!(%account, collateral, usd_value, "validator registered");
        Ok(vec![RegistryEvent::ValidatorRegistered {
            account,
            stake: collateral,
        }])
    }

    /// Records a liveness heartbeat for the current epoch.
    pub fn heartbeat(
        &mut self,
        account: AccountId,
        epoch: u64,
        now: u64,
    ) -> RegistryResult<Vec<RegistryEvent>> {
        let current = self.current_epoch;
        let validator = self
            .validators
            .get_mut(&account)
            .ok_or(RegistryError::NotRegistered(account))?;

        if !validator.active {
            return Err(RegistryError::NotActive(account));
        }
        if validator.is_jailed(now) {
            return Err(RegistryError::Jailed(account, validator.jailed_until));
        }
        if epoch != current {
            return Err(RegistryError::EpochMismatch {
                submitted: epoch,
                current,
            });
        }
        if validator.last_heartbeat_epoch == Some(epoch) {
            return Err(RegistryError::DuplicateHeartbeat { account, epoch });
        }

        validator.missed_heartbeats = 0;
        validator.last_heartbeat_ts = now;
        validator.last_heartbeat_epoch = Some(epoch);
        validator.recompute_score();
        let score = validator.score;

        debug!(%account, epoch, score, "heartbeat accepted");
        Ok(vec![
            RegistryEvent::HeartbeatReceived { account, epoch },
            RegistryEvent::PerformanceUpdated { account, score },
        ])
    }

    /// Punitively reduces a validator's stake.
    ///
    /// The service boundary restricts callers to the bridge trigger; the
    /// registry itself invokes this path for liveness auto-slashes.
    pub fn slash(
        &mut self,
        account: AccountId,
        reason: SlashReason,
        now: u64,
    ) -> RegistryResult<Vec<RegistryEvent>> {
        let validator = self
            .validators
            .get(&account)
            .ok_or(RegistryError::NotRegistered(account))?;
        if !validator.active {
            return Err(RegistryError::NotActive(account));
        }

        // The post-slash floor check needs a price, so a dead oracle rejects
        // the slash before any stake is touched.
        let price = self.positive_price()?;

        let mut events = Vec::new();
        self.apply_slash(account, reason, now, price, &mut events)?;
        Ok(events)
    }

    /// Deactivates the validator and starts the unbonding countdown.
    pub fn start_unbonding(
        &mut self,
        account: AccountId,
        now: u64,
    ) -> RegistryResult<Vec<RegistryEvent>> {
        let period = self.params.unbonding_period_secs;
        let validator = self
            .validators
            .get_mut(&account)
            .ok_or(RegistryError::NotRegistered(account))?;

        if !validator.active {
            return Err(RegistryError::NotActive(account));
        }
        if validator.is_jailed(now) {
            return Err(RegistryError::Jailed(account, validator.jailed_until));
        }

        validator.active = false;
        let completes_at = now + period;
        validator.unbonding_completes_at = completes_at;
        self.remove_from_active_set(&account);

        info!(%account, completes_at, "unbonding started");
        Ok(vec![RegistryEvent::UnbondingStarted {
            account,
            completes_at,
        }])
    }

    /// Releases the full remaining stake once the unbonding period elapsed.
    ///
    /// The stake debit and the outbound credit are atomic together: stake is
    /// zeroed only after the collateral bank accepts the transfer.
    pub fn withdraw(&mut self, account: AccountId, now: u64) -> RegistryResult<Vec<RegistryEvent>> {
        let validator = self
            .validators
            .get(&account)
            .ok_or(RegistryError::NotRegistered(account))?;

        if validator.active {
            return Err(RegistryError::StillActive(account));
        }
        if validator.unbonding_completes_at == 0 {
            return Err(RegistryError::NotUnbonding(account));
        }
        if now < validator.unbonding_completes_at {
            return Err(RegistryError::UnbondingNotComplete {
                account,
                completes_at: validator.unbonding_completes_at,
                now,
            });
        }
        if validator.stake == 0 {
            return Err(RegistryError::NothingToWithdraw(account));
        }

        let amount = validator.stake;
        self.bank.credit(account, amount)?;

        // Only reachable after the credit succeeded.
        let validator = self
            .validators
            .get_mut(&account)
            .ok_or(RegistryError::NotRegistered(account))?;
        validator.stake = 0;

        info!(%account, amount, "stake withdrawn");
        Ok(vec![RegistryEvent::StakeWithdrawn { account, amount }])
    }

    /// Closes the current epoch: charges every active validator that missed
    /// its heartbeat, auto-slashing repeat offenders, then advances the epoch
    /// counter. Never call this to "redo" a closed epoch.
    pub fn progress_epoch(&mut self, now: u64) -> RegistryResult<Vec<RegistryEvent>> {
        let closing = self.current_epoch;
        let threshold = self.params.max_missed_heartbeats;

        // Plan the whole epoch close before the first write: each missed
        // active validator gets a counter charge, and the ones the charge
        // pushes to the threshold carry the slash price. The oracle is
        // consulted lazily here, so a dead feed rejects the call while the
        // state is still untouched.
        let mut price = None;
        let mut charges: Vec<(AccountId, Option<u128>)> = Vec::new();
        for account in &self.active_set {
            let Some(validator) = self.validators.get(account) else {
                continue;
            };
            if validator.last_heartbeat_epoch == Some(closing) {
                continue;
            }
            let slash_price = if validator.active && validator.missed_heartbeats + 1 >= threshold {
                let p = match price {
                    Some(p) => p,
                    None => {
                        let p = self.positive_price()?;
                        price = Some(p);
                        p
                    }
                };
                Some(p)
            } else {
                None
            };
            charges.push((*account, slash_price));
        }

        let mut events = Vec::new();
        for (account, slash_price) in charges {
            let validator = self
                .validators
                .get_mut(&account)
                .ok_or(RegistryError::NotRegistered(account))?;
            validator.missed_heartbeats += 1;
            let misses = validator.missed_heartbeats;

            if let Some(price) = slash_price {
                warn!(%account, misses, epoch = closing, "auto-slashing offline validator");
                self.apply_slash(account, SlashReason::Offline, now, price, &mut events)?;
            }
        }

        self.current_epoch = closing + 1;
        events.push(RegistryEvent::EpochAdvanced {
            epoch: self.current_epoch,
        });
        debug!(epoch = self.current_epoch, "epoch advanced");
        Ok(events)
    }

    // Read accessors.

    pub fn current_epoch(&self) -> u64 {
        self.current_epoch
    }

    pub fn validator(&self, account: &AccountId) -> Option<&Validator> {
        self.validators.get(account)
    }

    pub fn is_active_validator(&self, account: &AccountId) -> bool {
        self.validators
            .get(account)
            .is_some_and(|v| v.active)
    }

    pub fn is_jailed(&self, account: &AccountId, now: u64) -> bool {
        self.validators
            .get(account)
            .is_some_and(|v| v.is_jailed(now))
    }

    /// Returns the accounts that are both active and not jailed as of `now`.
    pub fn active_validators(&self, now: u64) -> Vec<AccountId> {
        self.active_set
            .iter()
            .filter(|account| {
                self.validators
                    .get(account)
                    .is_some_and(|v| v.active && !v.is_jailed(now))
            })
            .copied()
            .collect()
    }

    /// Performance score in basis points, if the account is registered.
    pub fn validator_performance(&self, account: &AccountId) -> Option<u32> {
        self.validators.get(account).map(|v| v.score)
    }

    /// The append-only slash log.
    pub fn slash_events(&self) -> &[SlashEvent] {
        &self.slash_log
    }

    // Internals.

    /// Fetches the latest oracle price, rejecting non-positive values.
    fn positive_price(&self) -> RegistryResult<u128> {
        let quote = self.oracle.latest_price()?;
        if quote.price <= 0 {
            return Err(RegistryError::NonPositivePrice(quote.price));
        }
        Ok(quote.price as u128)
    }

    /// Applies a slash to a validator known to exist and be active.
    fn apply_slash(
        &mut self,
        account: AccountId,
        reason: SlashReason,
        now: u64,
        price: u128,
        events: &mut Vec<RegistryEvent>,
    ) -> RegistryResult<()> {
        let bps = match reason {
            SlashReason::DoubleSign => self.params.double_sign_slash_bps,
            SlashReason::Offline => self.params.offline_slash_bps,
        };
        let jail_duration = self.params.jail_duration_secs;

        let validator = self
            .validators
            .get_mut(&account)
            .ok_or(RegistryError::NotRegistered(account))?;

        let amount = slash_amount(validator.stake, bps);
        validator.stake -= amount;
        validator.total_slashed += amount;

        events.push(RegistryEvent::ValidatorSlashed {
            account,
            amount,
            reason,
        });

        if let SlashReason::DoubleSign = reason {
            let until = now + jail_duration;
            validator.jailed_until = until;
            events.push(RegistryEvent::ValidatorJailed { account, until });
        }

        let remaining = validator.stake;
        let seq = self.slash_log.len() as u64;
        self.slash_log
            .push(SlashEvent::new(seq, account, amount, reason, now));

        info!(%account, amount, ?reason, remaining, "validator slashed");

        if !self.params.meets_stake_floor(remaining, price) {
            if let Some(validator) = self.validators.get_mut(&account) {
                validator.active = false;
            }
            self.remove_from_active_set(&account);
            warn!(%account, remaining, "stake below floor, validator deactivated");
            events.push(RegistryEvent::ValidatorDeactivated { account });
        }

        Ok(())
    }

    /// O(1) removal; the active set is unordered by contract.
    fn remove_from_active_set(&mut self, account: &AccountId) {
        if let Some(pos) = self.active_set.iter().position(|a| a == account) {
            self.active_set.swap_remove(pos);
        }
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("validators", &self.validators.len())
            .field("active_set", &self.active_set.len())
            .field("slash_log", &self.slash_log.len())
            .field("current_epoch", &self.current_epoch)
            .finish()
    }
}
