//! # Logging
//!
//! `tracing` subscriber setup for the server binary.
//!
//! `RUST_LOG` wins over the configured level when set. Output is plain text
//! unless `logging.json` is enabled.

use crate::infrastructure::config::LoggingConfig;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Noisy dependency targets capped at `warn` unless `RUST_LOG` says otherwise.
const QUIET_TARGETS: &str = "hyper=warn,hyper_util=warn,reqwest=warn,h2=warn";

/// Error raised when a global subscriber cannot be installed.
#[derive(Debug, Error)]
#[error("failed to initialise tracing: {0}")]
pub struct LoggingError(#[from] TryInitError);

/// Builds the filter from `RUST_LOG`, falling back to the configured level.
#[must_use]
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},{QUIET_TARGETS}", config.level)))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns `LoggingError` if a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), LoggingError> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()?;
    }

    Ok(())
}
