//! Hashing helpers.
//!
//! Uses [RustCrypto's SHA-2 crate](https://github.com/RustCrypto/hashes/tree/master/sha2)
//! so the same digests are available inside proving environments.

use sha2::{Digest, Sha256};

use crate::buf::Buf32;

/// Computes the SHA-256 digest of the input.
pub fn sha256(data: &[u8]) -> Buf32 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Buf32::new(hasher.finalize().into())
}

/// Combines two nodes into their parent digest.
///
/// This is the two-input hash used at every level of a Merkle inclusion
/// path; ordering of the operands is decided by the caller.
pub fn merge(left: &Buf32, right: &Buf32) -> Buf32 {
    let mut hasher = Sha256::new();
    hasher.update(left.as_slice());
    hasher.update(right.as_slice());
    Buf32::new(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn test_sha256_empty() {
        // Well-known SHA-256 of the empty string.
        let expected =
            Buf32::new(hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"));
        assert_eq!(sha256(&[]), expected);
    }

    #[test]
    fn test_merge_is_order_sensitive() {
        let a = sha256(b"a");
        let b = sha256(b"b");
        assert_ne!(merge(&a, &b), merge(&b, &a));
    }

    #[test]
    fn test_merge_matches_concat() {
        let a = sha256(b"left");
        let b = sha256(b"right");
        let mut concat = Vec::new();
        concat.extend_from_slice(a.as_slice());
        concat.extend_from_slice(b.as_slice());
        assert_eq!(merge(&a, &b), sha256(&concat));
    }
}
