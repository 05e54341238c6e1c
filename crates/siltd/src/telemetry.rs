//! Tracing initialization for the silt daemon.

use tracing_subscriber::EnvFilter;

/// Initialize the `tracing` subscriber with the given level filter.
///
/// Call this once at startup, before any `tracing` events are emitted.
/// Respects `RUST_LOG` env var if set, otherwise uses the config value.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
