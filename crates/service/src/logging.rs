//! Logging bootstrap.

use tracing_subscriber::EnvFilter;

/// Initializes compact stdout logging at INFO by default, overridable via
/// `RUST_LOG`. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .try_init();
}
