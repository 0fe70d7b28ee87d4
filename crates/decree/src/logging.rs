//! Tracing subscriber setup
//!
//! Events go to stderr so stdout stays reserved for command output.

use tracing_subscriber::EnvFilter;

use crate::{Error, Result};

/// Build the filter: `RUST_LOG` when set, else `directives`
///
/// # Errors
///
/// Returns error if the directives do not parse
pub fn filter(directives: &str) -> Result<EnvFilter> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(env) if !env.is_empty() => EnvFilter::try_new(env),
        _ => EnvFilter::try_new(directives),
    };
    filter.map_err(|e| Error::LoggingError(format!("Invalid log filter: {e}")))
}

/// Install the global fmt subscriber
///
/// # Errors
///
/// Returns error if the filter is invalid or a subscriber is already installed
pub fn init(directives: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(directives)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::LoggingError(e.to_string()))
}
