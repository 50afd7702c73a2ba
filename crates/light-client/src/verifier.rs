//! Attestation verification seam.

use crosslink_primitives::Buf48;

use crate::types::{BlockHeader, HeaderAttestation};

/// Verifies that a header submission carries a valid aggregate attestation
/// from the registered submitter set.
///
/// The implementation is injected at client construction so that proper
/// aggregate-signature verification can replace the interim one without
/// touching the acceptance logic.
pub trait SignatureVerifier: Send + Sync {
    /// Returns whether the attestation authorizes the header.
    ///
    /// `submitter_keys` is the current registered submitter key set;
    /// `threshold` is the configured signature threshold.
    fn verify(
        &self,
        header: &BlockHeader,
        attestation: &HeaderAttestation,
        submitter_keys: &[Buf48],
        threshold: u32,
    ) -> bool;
}

/// Interim verifier that only checks the attestation material is structurally
/// present: a non-zero signature and at least one registered submitter key.
///
/// TODO replace with BLS aggregate verification against the submitter key set
/// once the signing side produces real aggregates.
#[derive(Copy, Clone, Debug, Default)]
pub struct MaterialPresenceVerifier;

impl SignatureVerifier for MaterialPresenceVerifier {
    fn verify(
        &self,
        _header: &BlockHeader,
        attestation: &HeaderAttestation,
        submitter_keys: &[Buf48],
        _threshold: u32,
    ) -> bool {
        if attestation.signature().is_zero() {
            return false;
        }
        submitter_keys.iter().any(|key| !key.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use crosslink_primitives::{Buf32, Buf96};

    use super::*;

    fn header() -> BlockHeader {
        BlockHeader::new(
            Buf32::new([1; 32]),
            Buf32::zero(),
            Buf32::zero(),
            Buf32::zero(),
            1,
            0,
            1,
        )
    }

    #[test]
    fn test_rejects_zero_signature() {
        let verifier = MaterialPresenceVerifier;
        let att = HeaderAttestation::new(Buf96::zero(), 1);
        assert!(!verifier.verify(&header(), &att, &[Buf48::new([1; 48])], 1));
    }

    #[test]
    fn test_rejects_all_zero_keys() {
        let verifier = MaterialPresenceVerifier;
        let att = HeaderAttestation::new(Buf96::new([2; 96]), 1);
        assert!(!verifier.verify(&header(), &att, &[Buf48::zero()], 1));
        assert!(!verifier.verify(&header(), &att, &[], 1));
    }

    #[test]
    fn test_accepts_present_material() {
        let verifier = MaterialPresenceVerifier;
        let att = HeaderAttestation::new(Buf96::new([2; 96]), 1);
        assert!(verifier.verify(&header(), &att, &[Buf48::new([1; 48])], 1));
    }
}
