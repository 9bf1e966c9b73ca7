//! Structured logging bootstrap for the giftgate compliance core.
//!
//! One call at process start wires a `tracing` subscriber with env-filter
//! support; every crate in the workspace then logs through `tracing`
//! macros without further setup.

#![warn(missing_docs, clippy::pedantic)]

use tracing_subscriber::EnvFilter;

/// Environment variable consulted for filter directives when the caller
/// passes none.
pub const LOG_FILTER_ENV: &str = "GIFTGATE_LOG";

/// Installs the global fmt subscriber, filtered by `directives`.
///
/// Returns `false` when a global subscriber is already installed, which
/// makes repeated calls (tests, embedded use) harmless.
pub fn try_init(directives: &str) -> bool {
    let filter = EnvFilter::try_new(directives)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .try_init()
        .is_ok()
}

/// Installs the global subscriber using the `GIFTGATE_LOG` environment
/// variable, defaulting to `info`.
pub fn init() {
    let directives =
        std::env::var(LOG_FILTER_ENV).unwrap_or_else(|_| "info".to_owned());
    let _ = try_init(&directives);
}
