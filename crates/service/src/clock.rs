//! Time source abstraction.
//!
//! Every timestamp comparison in the core (jail expiry, unbonding, epoch
//! accounting) evaluates "now" at call time, so the clock is injected to
//! keep those paths testable.

use std::time::{SystemTime, UNIX_EPOCH};

/// Supplies the current unix time in seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall clock.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock: system time before unix epoch")
            .as_secs()
    }
}
