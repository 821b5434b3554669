//! Logging initialization for the `hrl` binary.
//!
//! Configures the `tracing` subscriber with level filtering via the `HRL_LOG`
//! environment variable. Falls back to the configured level (`[log] level`,
//! `info` by default) when the variable is unset or invalid.
//!
//! ```bash
//! HRL_LOG=debug hrl decode eeprom dump.txt
//! HRL_LOG=hr20_layout=trace,warn hrl fields trace
//! ```

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::schema::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "HRL_LOG";

/// Build the filter from `HRL_LOG`, or from `fallback` when unset or invalid.
pub fn filter(fallback: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback.as_directive()))
}

/// Initialize the tracing subscriber, writing to stderr.
///
/// Stdout stays reserved for command output. Calling this more than once is
/// harmless; later calls leave the first subscriber in place.
pub fn init(fallback: LogLevel) {
    let _ = fmt()
        .with_env_filter(filter(fallback))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
