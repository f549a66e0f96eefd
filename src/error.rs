use std::fmt;

use crate::config::ConfigError;
use crate::domain::ValidationError;
use crate::ingest::NormalizationError;
use crate::metrics::MetricError;

/// Crate-level error aggregating the component failures a pipeline pass
/// can surface. Nothing is retried internally; the core is deterministic,
/// so retrying without different input has no effect.
#[derive(Debug)]
pub enum EngineError {
    Config(ConfigError),
    Validation(ValidationError),
    Normalization(NormalizationError),
    Metric(MetricError),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Config(err) => write!(f, "configuration error: {}", err),
            EngineError::Validation(err) => write!(f, "validation error: {}", err),
            EngineError::Normalization(err) => write!(f, "normalization error: {}", err),
            EngineError::Metric(err) => write!(f, "metric error: {}", err),
            EngineError::Csv(err) => write!(f, "invalid CSV source data: {}", err),
            EngineError::Json(err) => write!(f, "invalid JSON source data: {}", err),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Config(err) => Some(err),
            EngineError::Validation(err) => Some(err),
            EngineError::Normalization(err) => Some(err),
            EngineError::Metric(err) => Some(err),
            EngineError::Csv(err) => Some(err),
            EngineError::Json(err) => Some(err),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<ValidationError> for EngineError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<NormalizationError> for EngineError {
    fn from(value: NormalizationError) -> Self {
        Self::Normalization(value)
    }
}

impl From<MetricError> for EngineError {
    fn from(value: MetricError) -> Self {
        Self::Metric(value)
    }
}

impl From<csv::Error> for EngineError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
