//! The bridge verification service.
//!
//! Wraps the registry, light client, and relay ledger behind a single
//! surface that enforces caller authorization and the serialization
//! guarantee: every mutating operation holds a write lock over the whole
//! component it touches, so reads-then-writes within one call never
//! interleave with another call's.

use std::sync::Arc;

use crosslink_light_client::{
    BlockHeader, HeaderAttestation, HeaderLightClient, SignatureVerifier,
};
use crosslink_params::ProtocolParams;
use crosslink_primitives::{AccountId, Buf32, Buf48};
use crosslink_proof::{verify_receipt_proof, ReceiptProof};
use crosslink_registry::{
    CollateralBank, PriceOracle, SlashEvent, SlashReason, ValidatorRegistry,
};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::{
    clock::Clock,
    config::ServiceConfig,
    errors::{ServiceError, ServiceResult},
    events::BridgeEvent,
    ledger::RelayLedger,
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// External collaborators injected at construction.
pub struct Collaborators {
    pub oracle: Arc<dyn PriceOracle>,
    pub bank: Arc<dyn CollateralBank>,
    pub verifier: Box<dyn SignatureVerifier>,
    pub clock: Arc<dyn Clock>,
}

pub struct BridgeService {
    registry: RwLock<ValidatorRegistry>,
    client: RwLock<HeaderLightClient>,
    ledger: RwLock<RelayLedger>,
    clock: Arc<dyn Clock>,
    events_tx: broadcast::Sender<BridgeEvent>,
    bridge_trigger: AccountId,
    governance: AccountId,
}

impl BridgeService {
    pub fn new(
        params: ProtocolParams,
        genesis: BlockHeader,
        config: ServiceConfig,
        collab: Collaborators,
    ) -> Self {
        let registry = ValidatorRegistry::new(params.clone(), collab.oracle, collab.bank);
        let client = HeaderLightClient::new(&params, genesis, collab.verifier);
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        info!(
            bridge_trigger = %config.bridge_trigger,
            governance = %config.governance,
            "bridge service started"
        );

        Self {
            registry: RwLock::new(registry),
            client: RwLock::new(client),
            ledger: RwLock::new(RelayLedger::new()),
            clock: collab.clock,
            events_tx,
            bridge_trigger: config.bridge_trigger,
            governance: config.governance,
        }
    }

    /// Subscribes to the bridge-wide event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.events_tx.subscribe()
    }

    fn emit<E: Into<BridgeEvent>>(&self, events: Vec<E>) {
        for event in events {
            let event = event.into();
            debug!(?event, "bridge event");
            // Send only fails when nobody is subscribed.
            let _ = self.events_tx.send(event);
        }
    }

    fn require_bridge_trigger(&self, caller: AccountId) -> ServiceResult<()> {
        if caller != self.bridge_trigger {
            return Err(ServiceError::NotBridgeTrigger(caller));
        }
        Ok(())
    }

    fn require_governance(&self, caller: AccountId) -> ServiceResult<()> {
        if caller != self.governance {
            return Err(ServiceError::NotGovernance(caller));
        }
        Ok(())
    }

    // Registry operations. The caller account acts on its own record except
    // where noted.

    pub fn register_validator(
        &self,
        caller: AccountId,
        pubkey: &[u8],
        collateral: u128,
    ) -> ServiceResult<()> {
        let now = self.clock.now();
        let events = self.registry.write().register(caller, pubkey, collateral, now)?;
        self.emit(events);
        Ok(())
    }

    pub fn heartbeat(&self, caller: AccountId, epoch: u64) -> ServiceResult<()> {
        let now = self.clock.now();
        let events = self.registry.write().heartbeat(caller, epoch, now)?;
        self.emit(events);
        Ok(())
    }

    /// Slashes a validator. Bridge trigger only.
    pub fn slash(
        &self,
        caller: AccountId,
        account: AccountId,
        reason: SlashReason,
    ) -> ServiceResult<()> {
        self.require_bridge_trigger(caller)?;
        let now = self.clock.now();
        let events = self.registry.write().slash(account, reason, now)?;
        self.emit(events);
        Ok(())
    }

    pub fn start_unbonding(&self, caller: AccountId) -> ServiceResult<()> {
        let now = self.clock.now();
        let events = self.registry.write().start_unbonding(caller, now)?;
        self.emit(events);
        Ok(())
    }

    pub fn withdraw(&self, caller: AccountId) -> ServiceResult<()> {
        let now = self.clock.now();
        let events = self.registry.write().withdraw(caller, now)?;
        self.emit(events);
        Ok(())
    }

    /// Closes the current epoch, applying liveness penalties. Bridge trigger
    /// only, since it drives the epoch cadence.
    pub fn progress_epoch(&self, caller: AccountId) -> ServiceResult<()> {
        self.require_bridge_trigger(caller)?;
        let now = self.clock.now();
        let events = self.registry.write().progress_epoch(now)?;
        self.emit(events);
        Ok(())
    }

    // Light client operations.

    /// Submits a header. The caller must be a registered submitter; the
    /// membership check and the submission happen under one write lock.
    pub fn submit_header(
        &self,
        caller: AccountId,
        header: BlockHeader,
        attestation: &HeaderAttestation,
    ) -> ServiceResult<()> {
        let mut client = self.client.write();
        if !client.is_submitter(&caller) {
            return Err(ServiceError::NotSubmitter(caller));
        }
        let events = client.submit_header(header, attestation)?;
        drop(client);
        self.emit(events);
        Ok(())
    }

    pub fn add_submitter(
        &self,
        caller: AccountId,
        account: AccountId,
        pubkey: Buf48,
    ) -> ServiceResult<()> {
        self.require_governance(caller)?;
        let events = self.client.write().add_submitter(account, pubkey)?;
        self.emit(events);
        Ok(())
    }

    pub fn remove_submitter(&self, caller: AccountId, account: AccountId) -> ServiceResult<()> {
        self.require_governance(caller)?;
        let events = self.client.write().remove_submitter(account)?;
        self.emit(events);
        Ok(())
    }

    pub fn set_signature_threshold(&self, caller: AccountId, threshold: u32) -> ServiceResult<()> {
        self.require_governance(caller)?;
        let events = self.client.write().set_signature_threshold(threshold)?;
        self.emit(events);
        Ok(())
    }

    pub fn set_strict_difficulty(&self, caller: AccountId, enabled: bool) -> ServiceResult<()> {
        self.require_governance(caller)?;
        let events = self.client.write().set_strict_difficulty(enabled);
        self.emit(events);
        Ok(())
    }

    // Receipt verification and relaying.

    /// Checks a receipt proof against the stored header it references.
    pub fn verify_receipt(&self, proof: &ReceiptProof) -> ServiceResult<()> {
        let client = self.client.read();
        let stored = client
            .header(proof.block_hash())
            .ok_or(ServiceError::UnknownHeader(*proof.block_hash()))?;
        verify_receipt_proof(proof, stored.header().receipts_root())?;
        Ok(())
    }

    /// Verifies a receipt proof and records the transfer it attests to.
    /// Bridge trigger only; a source transaction is only ever recorded once.
    pub fn relay_transfer(
        &self,
        caller: AccountId,
        proof: &ReceiptProof,
        source_tx: Buf32,
    ) -> ServiceResult<()> {
        self.require_bridge_trigger(caller)?;
        self.verify_receipt(proof)?;

        if !self.ledger.write().record(source_tx) {
            return Err(ServiceError::DuplicateTransfer(source_tx));
        }

        info!(%source_tx, "transfer recorded");
        self.emit(vec![BridgeEvent::TransferRecorded { source_tx }]);
        Ok(())
    }

    // Read accessors. Each takes one read lock, so it observes a consistent
    // component snapshot.

    pub fn current_epoch(&self) -> u64 {
        self.registry.read().current_epoch()
    }

    pub fn is_active_validator(&self, account: &AccountId) -> bool {
        self.registry.read().is_active_validator(account)
    }

    pub fn is_jailed(&self, account: &AccountId) -> bool {
        self.registry.read().is_jailed(account, self.clock.now())
    }

    pub fn active_validators(&self) -> Vec<AccountId> {
        self.registry.read().active_validators(self.clock.now())
    }

    pub fn validator_performance(&self, account: &AccountId) -> Option<u32> {
        self.registry.read().validator_performance(account)
    }

    pub fn slash_events(&self) -> Vec<SlashEvent> {
        self.registry.read().slash_events().to_vec()
    }

    pub fn validator_stake(&self, account: &AccountId) -> Option<u128> {
        self.registry.read().validator(account).map(|v| v.stake())
    }

    pub fn latest_finalized(&self) -> u64 {
        self.client.read().latest_finalized()
    }

    pub fn canonical_hash(&self, number: u64) -> Buf32 {
        self.client.read().canonical_hash(number)
    }

    pub fn is_finalized(&self, number: u64) -> bool {
        self.client.read().is_finalized(number)
    }

    pub fn header_range(&self, from: u64, to: u64) -> ServiceResult<Vec<Buf32>> {
        Ok(self.client.read().header_range(from, to)?)
    }

    pub fn is_transfer_processed(&self, source_tx: &Buf32) -> bool {
        self.ledger.read().is_processed(source_tx)
    }
}

impl std::fmt::Debug for BridgeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeService")
            .field("bridge_trigger", &self.bridge_trigger)
            .field("governance", &self.governance)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crosslink_light_client::MaterialPresenceVerifier;
    use crosslink_params::{NATIVE_UNIT, PRICE_SCALE};
    use crosslink_primitives::{hash::sha256, Buf96, ErrorKind};
    use crosslink_registry::{AcceptingBank, StaticPriceOracle};

    use super::*;
    use crate::clock::test_clock::ManualClock;

    const START: u64 = 1_000_000;
    const GENESIS_NUMBER: u64 = 100;
    const DIFFICULTY: u128 = 1;

    fn acct(b: u8) -> AccountId {
        AccountId::from([b; 32])
    }

    fn trigger() -> AccountId {
        acct(0xbb)
    }

    fn governance() -> AccountId {
        acct(0xcc)
    }

    fn genesis() -> BlockHeader {
        BlockHeader::new(
            Buf32::new([0xf0; 32]),
            Buf32::zero(),
            Buf32::zero(),
            Buf32::zero(),
            GENESIS_NUMBER,
            START,
            DIFFICULTY,
        )
    }

    fn attestation() -> HeaderAttestation {
        HeaderAttestation::new(Buf96::new([7; 96]), 1)
    }

    fn service() -> (BridgeService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(START));
        let config = ServiceConfig {
            bridge_trigger: trigger(),
            governance: governance(),
        };
        let collab = Collaborators {
            // 2000 USD per native unit.
            oracle: Arc::new(StaticPriceOracle::new(2_000 * PRICE_SCALE as i128, START)),
            bank: Arc::new(AcceptingBank),
            verifier: Box::new(MaterialPresenceVerifier),
            clock: clock.clone(),
        };
        let svc = BridgeService::new(ProtocolParams::default(), genesis(), config, collab);
        (svc, clock)
    }

    fn register(svc: &BridgeService, account: AccountId) {
        // 1000 native units, comfortably above the 1M USD floor.
        svc.register_validator(account, &[1u8; 48], 1_000 * NATIVE_UNIT)
            .expect("register");
    }

    #[test]
    fn test_register_emits_event() {
        let (svc, _) = service();
        let mut rx = svc.subscribe();

        register(&svc, acct(1));

        let event = rx.try_recv().expect("event");
        assert!(matches!(
            event,
            BridgeEvent::Registry(crosslink_registry::RegistryEvent::ValidatorRegistered { .. })
        ));
        assert!(svc.is_active_validator(&acct(1)));
    }

    #[test]
    fn test_slash_requires_bridge_trigger() {
        let (svc, _) = service();
        register(&svc, acct(1));

        let err = svc
            .slash(acct(1), acct(1), SlashReason::DoubleSign)
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotBridgeTrigger(_)));
        assert_eq!(err.kind(), ErrorKind::Authorization);

        svc.slash(trigger(), acct(1), SlashReason::DoubleSign)
            .expect("slash");
        assert_eq!(svc.validator_stake(&acct(1)), Some(950 * NATIVE_UNIT));
        assert!(svc.is_jailed(&acct(1)));
    }

    #[test]
    fn test_governance_gates_submitter_edits() {
        let (svc, _) = service();

        let err = svc
            .add_submitter(acct(1), acct(2), Buf48::new([2; 48]))
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotGovernance(_)));

        svc.add_submitter(governance(), acct(2), Buf48::new([2; 48]))
            .expect("add");
        svc.set_signature_threshold(governance(), 1)
            .expect("threshold");
        svc.remove_submitter(governance(), acct(2)).expect("remove");
    }

    #[test]
    fn test_submit_header_requires_submitter() {
        let (svc, _) = service();
        let header = BlockHeader::new(
            Buf32::new([1; 32]),
            *genesis().hash(),
            Buf32::zero(),
            Buf32::zero(),
            GENESIS_NUMBER + 1,
            START + 12,
            DIFFICULTY,
        );

        let err = svc
            .submit_header(acct(9), header.clone(), &attestation())
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotSubmitter(_)));
        assert_eq!(svc.latest_finalized(), GENESIS_NUMBER);

        svc.add_submitter(governance(), acct(9), Buf48::new([9; 48]))
            .expect("add submitter");
        svc.submit_header(acct(9), header, &attestation())
            .expect("submit");
        assert_eq!(svc.latest_finalized(), GENESIS_NUMBER + 1);
    }

    // Single-leaf receipt tree: the receipts root is the receipt's own hash.
    fn header_with_receipt(receipt_bytes: &[u8]) -> (BlockHeader, ReceiptProof) {
        let root = sha256(receipt_bytes);
        let header = BlockHeader::new(
            Buf32::new([1; 32]),
            *genesis().hash(),
            root,
            Buf32::zero(),
            GENESIS_NUMBER + 1,
            START + 12,
            DIFFICULTY,
        );
        let proof = ReceiptProof::new(
            *header.hash(),
            root,
            receipt_bytes.to_vec(),
            Vec::new(),
            0,
            0,
        );
        (header, proof)
    }

    #[test]
    fn test_verify_receipt_against_stored_header() {
        let (svc, _) = service();
        let (header, proof) = header_with_receipt(b"receipt");

        let err = svc.verify_receipt(&proof).unwrap_err();
        assert!(matches!(err, ServiceError::UnknownHeader(_)));

        svc.add_submitter(governance(), acct(9), Buf48::new([9; 48]))
            .expect("add submitter");
        svc.submit_header(acct(9), header, &attestation())
            .expect("submit");
        svc.verify_receipt(&proof).expect("verify");
    }

    #[test]
    fn test_relay_transfer_replay_protected() {
        let (svc, _) = service();
        let (header, proof) = header_with_receipt(b"receipt");
        svc.add_submitter(governance(), acct(9), Buf48::new([9; 48]))
            .expect("add submitter");
        svc.submit_header(acct(9), header, &attestation())
            .expect("submit");

        let source_tx = Buf32::new([0xab; 32]);
        let mut rx = svc.subscribe();

        let err = svc.relay_transfer(acct(1), &proof, source_tx).unwrap_err();
        assert!(matches!(err, ServiceError::NotBridgeTrigger(_)));

        svc.relay_transfer(trigger(), &proof, source_tx)
            .expect("relay");
        assert!(svc.is_transfer_processed(&source_tx));
        assert!(matches!(
            rx.try_recv().expect("event"),
            BridgeEvent::TransferRecorded { .. }
        ));

        let err = svc.relay_transfer(trigger(), &proof, source_tx).unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateTransfer(_)));
        assert_eq!(err.kind(), ErrorKind::StateConflict);
    }

    #[test]
    fn test_epoch_lifecycle_penalizes_absence() {
        let (svc, clock) = service();
        register(&svc, acct(1));

        svc.heartbeat(acct(1), 0).expect("heartbeat epoch 0");
        svc.progress_epoch(trigger()).expect("close epoch 0");
        assert_eq!(svc.current_epoch(), 1);
        assert!(svc.slash_events().is_empty());

        // Two silent epochs trigger the offline auto-slash.
        clock.advance(600);
        svc.progress_epoch(trigger()).expect("close epoch 1");
        clock.advance(600);
        svc.progress_epoch(trigger()).expect("close epoch 2");

        let slashes = svc.slash_events();
        assert_eq!(slashes.len(), 1);
        assert_eq!(slashes[0].reason(), SlashReason::Offline);
        assert_eq!(svc.validator_stake(&acct(1)), Some(990 * NATIVE_UNIT));
    }

    #[test]
    fn test_unbonding_then_withdraw() {
        let (svc, clock) = service();
        register(&svc, acct(1));

        svc.start_unbonding(acct(1)).expect("unbond");
        assert!(!svc.is_active_validator(&acct(1)));

        let err = svc.withdraw(acct(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StateConflict);

        clock.advance(ProtocolParams::default().unbonding_period_secs);
        svc.withdraw(acct(1)).expect("withdraw");
        assert_eq!(svc.validator_stake(&acct(1)), Some(0));
    }
}
