//! Tracing subscriber setup for host binaries and test harnesses.
//!
//! The core only emits events; installing a subscriber is the embedding
//! application's choice, so this stays a thin helper.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Build the event filter, preferring `RUST_LOG` when set and falling back
/// to the supplied directive.
pub fn filter_from_env_or(default_filter: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_filter).map_err(|source| TelemetryError::Filter {
            value: default_filter.to_string(),
            source,
        }),
    }
}

/// Install a compact stderr subscriber. Fails if a global subscriber is
/// already set, so hosts call this exactly once.
pub fn init(default_filter: &str) -> Result<(), TelemetryError> {
    let env_filter = filter_from_env_or(default_filter)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
