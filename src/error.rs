//! Error types for fleet construction and simulation runs.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"units.preventive_interval_hours"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Fatal errors raised before any simulation step runs.
///
/// Degraded outcomes such as a missing reserve are not errors; they are
/// counted on the engine and reported per step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("invalid time range: end {end} is before start {start}")]
    InvalidTimeRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}
