//! Logging setup
//!
//! Embedding applications usually install their own subscriber; this helper
//! is for hosts that do not.

use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber honouring `RUST_LOG`, else `default_directive`.
///
/// Fails instead of panicking when a global subscriber is already set.
pub fn init_logging(default_directive: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
}
