//! Bottom-up Merkle inclusion checking.

use crosslink_primitives::{hash::merge, Buf32};

/// Recomputes the root from a leaf and its sibling path.
///
/// At each level the sibling goes on the right when the running index is
/// even, on the left when odd; the index then halves. Ordering is decided by
/// index parity alone, never by comparing hash values.
pub fn verify_merkle_path(leaf: &Buf32, siblings: &[Buf32], index: u64, root: &Buf32) -> bool {
    let mut acc = *leaf;
    let mut idx = index;
    for sibling in siblings {
        acc = if idx % 2 == 0 {
            merge(&acc, sibling)
        } else {
            merge(sibling, &acc)
        };
        idx /= 2;
    }
    acc == *root
}
