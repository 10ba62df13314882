//! Tracing setup
//!
//! Structured logging via `tracing-subscriber` with an `EnvFilter`. The
//! `RUST_LOG` variable overrides the default filter as usual.

use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the global tracing subscriber
///
/// `default_filter` applies when `RUST_LOG` is unset (e.g. `"info"` or
/// `"skylight=debug,info"`). Safe to call more than once; only the first
/// call installs a subscriber.
pub fn init_telemetry(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
