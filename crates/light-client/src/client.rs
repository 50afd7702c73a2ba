//! Header store and canonical-chain logic.

use std::collections::HashMap;

use crosslink_params::ProtocolParams;
use crosslink_primitives::{AccountId, Buf32, Buf48};
use tracing::{debug, info};

use crate::{
    difficulty::validate_difficulty,
    errors::{ClientError, ClientResult},
    events::ClientEvent,
    types::{BlockHeader, HeaderAttestation, StoredHeader},
    verifier::SignatureVerifier,
};

/// Light client over the foreign source chain.
///
/// The canonical chain is a strictly increasing, gap-free sequence of block
/// numbers anchored at the genesis header; a canonical entry is never
/// replaced. The caller is responsible for serializing mutations (see the
/// service crate).
pub struct HeaderLightClient {
    headers: HashMap<Buf32, StoredHeader>,
    canonical: HashMap<u64, Buf32>,
    latest_finalized: u64,
    genesis_number: u64,
    submitters: HashMap<AccountId, Buf48>,
    signature_threshold: u32,
    min_difficulty: u128,
    max_difficulty_gap: u64,
    strict_difficulty: bool,
    verifier: Box<dyn SignatureVerifier>,
}

impl HeaderLightClient {
    /// Creates a client anchored at the given genesis header, which is
    /// trusted unconditionally.
    pub fn new(
        params: &ProtocolParams,
        genesis: BlockHeader,
        verifier: Box<dyn SignatureVerifier>,
    ) -> Self {
        let genesis_number = genesis.number();
        let genesis_hash = *genesis.hash();

        let mut headers = HashMap::new();
        headers.insert(
            genesis_hash,
            StoredHeader {
                header: genesis,
                verified: true,
            },
        );
        let mut canonical = HashMap::new();
        canonical.insert(genesis_number, genesis_hash);

        Self {
            headers,
            canonical,
            latest_finalized: genesis_number,
            genesis_number,
            submitters: HashMap::new(),
            signature_threshold: 0,
            min_difficulty: params.min_difficulty,
            max_difficulty_gap: params.max_difficulty_gap,
            strict_difficulty: params.strict_difficulty,
            verifier,
        }
    }

    /// Accepts or rejects a submitted header.
    ///
    /// The header becomes canonical immediately iff it directly extends the
    /// finalized tip. Submitting a header further ahead stores it without
    /// finalizing anything; it can be resubmitted once the chain catches up.
    pub fn submit_header(
        &mut self,
        header: BlockHeader,
        attestation: &HeaderAttestation,
    ) -> ClientResult<Vec<ClientEvent>> {
        if header.hash().is_zero() {
            return Err(ClientError::ZeroHash);
        }

        let number = header.number();
        if number <= self.latest_finalized {
            return Err(ClientError::NotAboveFinalized {
                number,
                finalized: self.latest_finalized,
            });
        }

        if header.difficulty() < self.min_difficulty {
            return Err(ClientError::DifficultyBelowFloor {
                difficulty: header.difficulty(),
                floor: self.min_difficulty,
            });
        }

        let canonical_parent = self
            .canonical
            .get(&(number - 1))
            .and_then(|hash| self.headers.get(hash));

        if let Some(parent) = canonical_parent {
            if self.strict_difficulty {
                let gap = number - parent.header.number();
                if !validate_difficulty(
                    parent.header.difficulty(),
                    header.difficulty(),
                    gap,
                    self.max_difficulty_gap,
                ) {
                    return Err(ClientError::DifficultyOutOfBand {
                        parent: parent.header.difficulty(),
                        current: header.difficulty(),
                    });
                }
            }

            let expected = *parent.header.hash();
            if *header.parent_hash() != expected {
                return Err(ClientError::ParentMismatch { number, expected });
            }
        }

        let keys: Vec<Buf48> = self.submitters.values().copied().collect();
        if !self
            .verifier
            .verify(&header, attestation, &keys, self.signature_threshold)
        {
            return Err(ClientError::AttestationRejected);
        }

        let hash = *header.hash();
        let finalizes = number == self.latest_finalized + 1;
        self.headers.insert(
            hash,
            StoredHeader {
                header,
                verified: finalizes,
            },
        );

        let mut events = vec![ClientEvent::HeaderSubmitted { hash, number }];
        if finalizes {
            self.canonical.insert(number, hash);
            self.latest_finalized = number;
            info!(%hash, number, "header finalized");
            events.push(ClientEvent::HeaderFinalized { hash, number });
        } else {
            debug!(%hash, number, finalized = self.latest_finalized, "header stored ahead of tip");
        }

        Ok(events)
    }

    // Read accessors.

    pub fn header(&self, hash: &Buf32) -> Option<&StoredHeader> {
        self.headers.get(hash)
    }

    /// Canonical hash at the given number; the zero hash for numbers that
    /// were never assigned (e.g. below the genesis anchor).
    pub fn canonical_hash(&self, number: u64) -> Buf32 {
        self.canonical.get(&number).copied().unwrap_or_default()
    }

    pub fn is_finalized(&self, number: u64) -> bool {
        number <= self.latest_finalized
    }

    pub fn latest_finalized(&self) -> u64 {
        self.latest_finalized
    }

    pub fn genesis_number(&self) -> u64 {
        self.genesis_number
    }

    /// Canonical hashes for every number in the inclusive range.
    pub fn header_range(&self, from: u64, to: u64) -> ClientResult<Vec<Buf32>> {
        if from > to {
            return Err(ClientError::InvertedRange { from, to });
        }
        if to > self.latest_finalized {
            return Err(ClientError::RangeBeyondFinalized {
                to,
                finalized: self.latest_finalized,
            });
        }
        Ok((from..=to).map(|n| self.canonical_hash(n)).collect())
    }

    pub fn is_submitter(&self, account: &AccountId) -> bool {
        self.submitters.contains_key(account)
    }

    pub fn submitter_count(&self) -> u32 {
        self.submitters.len() as u32
    }

    pub fn signature_threshold(&self) -> u32 {
        self.signature_threshold
    }

    // Validator-set management. The service boundary restricts these to the
    // governance authority.

    pub fn add_submitter(
        &mut self,
        account: AccountId,
        pubkey: Buf48,
    ) -> ClientResult<Vec<ClientEvent>> {
        if self.submitters.contains_key(&account) {
            return Err(ClientError::DuplicateSubmitter(account));
        }
        self.submitters.insert(account, pubkey);
        info!(%account, "submitter added");
        Ok(vec![ClientEvent::SubmitterAdded { account }])
    }

    /// Removes a submitter. Headers it already attested to stay accepted.
    pub fn remove_submitter(&mut self, account: AccountId) -> ClientResult<Vec<ClientEvent>> {
        if self.submitters.remove(&account).is_none() {
            return Err(ClientError::UnknownSubmitter(account));
        }
        info!(%account, "submitter removed");
        Ok(vec![ClientEvent::SubmitterRemoved { account }])
    }

    pub fn set_signature_threshold(&mut self, threshold: u32) -> ClientResult<Vec<ClientEvent>> {
        let submitters = self.submitter_count();
        if threshold > submitters {
            return Err(ClientError::ThresholdTooHigh {
                threshold,
                submitters,
            });
        }
        self.signature_threshold = threshold;
        info!(threshold, "signature threshold updated");
        Ok(vec![ClientEvent::ThresholdUpdated { threshold }])
    }

    pub fn set_strict_difficulty(&mut self, enabled: bool) -> Vec<ClientEvent> {
        self.strict_difficulty = enabled;
        info!(enabled, "strict difficulty toggled");
        vec![ClientEvent::StrictDifficultyUpdated { enabled }]
    }
}

impl std::fmt::Debug for HeaderLightClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderLightClient")
            .field("headers", &self.headers.len())
            .field("latest_finalized", &self.latest_finalized)
            .field("submitters", &self.submitters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crosslink_primitives::Buf96;

    use super::*;
    use crate::verifier::MaterialPresenceVerifier;

    const DIFFICULTY: u128 = 1_000_000;

    fn hash(b: u8) -> Buf32 {
        Buf32::new([b; 32])
    }

    fn acct(b: u8) -> AccountId {
        AccountId::from([b; 32])
    }

    fn attestation() -> HeaderAttestation {
        HeaderAttestation::new(Buf96::new([7; 96]), 1)
    }

    fn genesis() -> BlockHeader {
        BlockHeader::new(
            hash(0xf0),
            Buf32::zero(),
            Buf32::zero(),
            Buf32::zero(),
            100,
            1_000,
            DIFFICULTY,
        )
    }

    fn child(parent: &BlockHeader, hash_byte: u8, difficulty: u128) -> BlockHeader {
        BlockHeader::new(
            hash(hash_byte),
            *parent.hash(),
            hash(0xaa),
            hash(0xbb),
            parent.number() + 1,
            parent.timestamp() + 12,
            difficulty,
        )
    }

    fn client() -> HeaderLightClient {
        let mut client = HeaderLightClient::new(
            &ProtocolParams::default(),
            genesis(),
            Box::new(MaterialPresenceVerifier),
        );
        client
            .add_submitter(acct(1), Buf48::new([1; 48]))
            .expect("add submitter");
        client
    }

    #[test]
    fn test_sequential_extension_finalizes() {
        let mut client = client();
        let header = child(&genesis(), 0x01, DIFFICULTY);

        let events = client
            .submit_header(header.clone(), &attestation())
            .expect("submit");

        assert_eq!(client.latest_finalized(), 101);
        assert_eq!(client.canonical_hash(101), *header.hash());
        assert!(client.is_finalized(101));
        assert!(client.header(header.hash()).expect("stored").is_verified());
        assert!(events
            .iter()
            .any(|e| matches!(e, ClientEvent::HeaderFinalized { number: 101, .. })));
    }

    #[test]
    fn test_ahead_of_tip_stores_without_finalizing() {
        let mut client = client();
        let n1 = child(&genesis(), 0x01, DIFFICULTY);
        let n2 = child(&n1, 0x02, DIFFICULTY);

        let events = client
            .submit_header(n2.clone(), &attestation())
            .expect("submit ahead");

        assert_eq!(client.latest_finalized(), 100);
        assert!(!client.header(n2.hash()).expect("stored").is_verified());
        assert!(!client.is_finalized(102));
        assert!(!events
            .iter()
            .any(|e| matches!(e, ClientEvent::HeaderFinalized { .. })));

        // Catch up, then resubmit the stored header to finalize it.
        client.submit_header(n1, &attestation()).expect("submit n+1");
        client
            .submit_header(n2.clone(), &attestation())
            .expect("resubmit n+2");
        assert_eq!(client.latest_finalized(), 102);
        assert!(client.header(n2.hash()).expect("stored").is_verified());
    }

    #[test]
    fn test_rejects_zero_hash() {
        let mut client = client();
        let mut header = child(&genesis(), 0x01, DIFFICULTY);
        header = BlockHeader::new(
            Buf32::zero(),
            *header.parent_hash(),
            *header.receipts_root(),
            *header.state_root(),
            header.number(),
            header.timestamp(),
            header.difficulty(),
        );
        let err = client.submit_header(header, &attestation()).unwrap_err();
        assert!(matches!(err, ClientError::ZeroHash));
    }

    #[test]
    fn test_rejects_stale_number() {
        let mut client = client();
        let mut header = genesis();
        header = BlockHeader::new(
            hash(0x05),
            *header.parent_hash(),
            *header.receipts_root(),
            *header.state_root(),
            100,
            header.timestamp(),
            DIFFICULTY,
        );
        let err = client.submit_header(header, &attestation()).unwrap_err();
        assert!(matches!(err, ClientError::NotAboveFinalized { .. }));
    }

    #[test]
    fn test_rejects_difficulty_below_floor() {
        let mut client = client();
        let header = child(&genesis(), 0x01, 0);
        let err = client.submit_header(header, &attestation()).unwrap_err();
        assert!(matches!(err, ClientError::DifficultyBelowFloor { .. }));
    }

    #[test]
    fn test_rejects_out_of_band_difficulty() {
        let mut client = client();
        let step = DIFFICULTY / crosslink_params::DIFFICULTY_BOUND_DIVISOR;
        let header = child(&genesis(), 0x01, DIFFICULTY + step + 1);

        let err = client
            .submit_header(header.clone(), &attestation())
            .unwrap_err();
        assert!(matches!(err, ClientError::DifficultyOutOfBand { .. }));

        // The same header passes once strict checking is off.
        client.set_strict_difficulty(false);
        client.submit_header(header, &attestation()).expect("submit");
    }

    #[test]
    fn test_accepts_difficulty_band_bounds() {
        let mut client = client();
        let step = DIFFICULTY / crosslink_params::DIFFICULTY_BOUND_DIVISOR;
        let upper = child(&genesis(), 0x01, DIFFICULTY + step);
        client.submit_header(upper, &attestation()).expect("upper bound");

        let lower = child(
            client.header(&client.canonical_hash(101)).unwrap().header(),
            0x02,
            DIFFICULTY + step - (DIFFICULTY + step) / crosslink_params::DIFFICULTY_BOUND_DIVISOR,
        );
        client.submit_header(lower, &attestation()).expect("lower bound");
    }

    #[test]
    fn test_rejects_parent_mismatch() {
        let mut client = client();
        let mut header = child(&genesis(), 0x01, DIFFICULTY);
        header = BlockHeader::new(
            *header.hash(),
            hash(0xde),
            *header.receipts_root(),
            *header.state_root(),
            header.number(),
            header.timestamp(),
            header.difficulty(),
        );
        let err = client.submit_header(header, &attestation()).unwrap_err();
        assert!(matches!(err, ClientError::ParentMismatch { number: 101, .. }));
    }

    #[test]
    fn test_rejects_zero_attestation() {
        let mut client = client();
        let header = child(&genesis(), 0x01, DIFFICULTY);
        let zero_att = HeaderAttestation::new(Buf96::zero(), 0);
        let err = client.submit_header(header, &zero_att).unwrap_err();
        assert!(matches!(err, ClientError::AttestationRejected));
        assert_eq!(
            err.kind(),
            crosslink_primitives::ErrorKind::Authorization
        );
    }

    #[test]
    fn test_header_range_queries() {
        let mut client = client();
        let n1 = child(&genesis(), 0x01, DIFFICULTY);
        client.submit_header(n1.clone(), &attestation()).expect("submit");

        let range = client.header_range(100, 101).expect("range");
        assert_eq!(range, vec![*genesis().hash(), *n1.hash()]);

        // Numbers below the genesis anchor were never assigned.
        let range = client.header_range(99, 100).expect("range");
        assert_eq!(range[0], Buf32::zero());

        assert!(matches!(
            client.header_range(101, 100).unwrap_err(),
            ClientError::InvertedRange { .. }
        ));
        assert!(matches!(
            client.header_range(100, 102).unwrap_err(),
            ClientError::RangeBeyondFinalized { .. }
        ));
    }

    #[test]
    fn test_submitter_removal_keeps_finalized_headers() {
        let mut client = client();
        let n1 = child(&genesis(), 0x01, DIFFICULTY);
        client.submit_header(n1.clone(), &attestation()).expect("submit");

        client.remove_submitter(acct(1)).expect("remove");
        assert!(!client.is_submitter(&acct(1)));
        assert_eq!(client.canonical_hash(101), *n1.hash());
        assert!(client.is_finalized(101));
    }

    #[test]
    fn test_threshold_bounded_by_submitter_count() {
        let mut client = client();
        client.set_signature_threshold(1).expect("threshold 1");

        let err = client.set_signature_threshold(2).unwrap_err();
        assert!(matches!(err, ClientError::ThresholdTooHigh { .. }));
        assert_eq!(
            err.kind(),
            crosslink_primitives::ErrorKind::StateConflict
        );
    }

    #[test]
    fn test_duplicate_submitter_rejected() {
        let mut client = client();
        let err = client
            .add_submitter(acct(1), Buf48::new([9; 48]))
            .unwrap_err();
        assert!(matches!(err, ClientError::DuplicateSubmitter(_)));
    }
}
