//! Subscriber installation.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

use crate::{LogFormat, ObservabilityConfig, ObservabilityError};

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Filter built from `RUST_LOG` when set, otherwise from `fallback`.
pub fn env_filter(fallback: &str) -> Result<EnvFilter, ObservabilityError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(fallback).map_err(|e| {
            ObservabilityError::Config(format!("invalid log level '{fallback}': {e}"))
        }),
    }
}

/// Install the global `tracing` subscriber.
///
/// Events go to stderr so that stdout stays free for command output. Only the
/// first successful call installs a subscriber; later calls return
/// [`ObservabilityError::TracingInit`].
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), ObservabilityError> {
    let filter = env_filter(&config.log_level)?;

    INITIALIZED
        .set(())
        .map_err(|_| ObservabilityError::TracingInit("Already initialized".to_string()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;

    tracing::debug!(
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Initialized structured logging"
    );

    Ok(())
}
