//! Tracing subscriber setup for the command-line binary.

use std::io::{self, IsTerminal};

use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding a log filter directive, e.g. `keysync=debug`.
pub const LOG_ENV: &str = "KEYSYNC_LOG";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(String),
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Filter used when `KEYSYNC_LOG` is unset.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "keysync=debug" } else { "warn" }
}

/// Install a stderr fmt subscriber.
///
/// `KEYSYNC_LOG` wins over the verbosity flag.
pub fn init(verbose: bool) -> Result<(), TelemetryError> {
    let directive = std::env::var(LOG_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default_filter(verbose).to_string());
    let filter =
        EnvFilter::try_new(&directive).map_err(|error| TelemetryError::Filter(error.to_string()))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .without_time()
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}
