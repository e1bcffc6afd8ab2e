//! Shared setup for the runnable examples.
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TADA_LOG";

/// Install a `fmt` subscriber filtered by `TADA_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
    tracing::debug!(env = LOG_ENV, "tracing initialized");
}
