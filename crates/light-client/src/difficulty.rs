//! Difficulty validation for submitted headers.

use crosslink_params::{AUTHORITY_DIFFICULTY_MAX, DIFFICULTY_BOUND_DIVISOR};

/// Validates a claimed block difficulty against its canonical parent.
///
/// Rules, in order:
/// - A block gap larger than `max_gap` skips validation entirely. This is
///   intentional: it lets the client bootstrap trust across long gaps.
/// - Difficulties at or below [`AUTHORITY_DIFFICULTY_MAX`] on both sides mark
///   an authority-based chain with no work adjustment to check.
/// - Otherwise the chain is work-based and the difficulty may move at most
///   one adjustment step (parent / 2^11) per block, bounds inclusive.
pub fn validate_difficulty(
    parent_difficulty: u128,
    current_difficulty: u128,
    block_gap: u64,
    max_gap: u64,
) -> bool {
    if block_gap > max_gap {
        return true;
    }

    if parent_difficulty <= AUTHORITY_DIFFICULTY_MAX
        && current_difficulty <= AUTHORITY_DIFFICULTY_MAX
    {
        return true;
    }

    let step = parent_difficulty / DIFFICULTY_BOUND_DIVISOR;
    let lower = parent_difficulty.saturating_sub(step);
    let upper = parent_difficulty.saturating_add(step);
    (lower..=upper).contains(&current_difficulty)
}
