//! Core error types for pomoset-core.
//!
//! This module defines the error hierarchy using thiserror so that the
//! timer engine, the service and the CLI report failures consistently.

use chrono::NaiveDateTime;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomoset-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The current time falls outside every work window.
    #[error("Out of Work! no work window is open at {at}")]
    OutOfWork { at: NaiveDateTime },

    /// The pause-unit equation could not be solved; the current set is aborted.
    #[error("Degenerate equation: {0}")]
    DegenerateEquation(#[from] EquationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Reasons the linear pause-unit equation has no usable solution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EquationError {
    /// Every session is already resolved, so there is nothing to solve for.
    #[error("no unknown remains in the equation")]
    NoUnknown,

    /// The symbolic terms cancel out, leaving `0 * x` on the left-hand side.
    #[error("coefficient of the unknown is {coefficient}, equation is not linear in x")]
    ZeroCoefficient { coefficient: f64 },

    /// Idle delays and resolved sessions already exceed the available time.
    #[error("numeric terms ({numeric}s) exceed the available time ({total}s)")]
    Infeasible { numeric: f64, total: f64 },

    /// An input was NaN or infinite.
    #[error("non-finite term in equation: {0}")]
    NonFinite(f64),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-separated key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// The config directory could not be resolved or created
    #[error("Config directory unavailable: {0}")]
    DataDir(String),
}

impl CoreError {
    /// Stable label for log fields.
    pub fn label(&self) -> &'static str {
        match self {
            CoreError::OutOfWork { .. } => "out_of_work",
            CoreError::DegenerateEquation(_) => "degenerate_equation",
            CoreError::Config(_) => "config",
            CoreError::Io(_) => "io",
            CoreError::Json(_) => "json",
            CoreError::Custom(_) => "custom",
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equation_error_converts_into_core_error() {
        let err: CoreError = EquationError::NoUnknown.into();
        assert!(matches!(err, CoreError::DegenerateEquation(EquationError::NoUnknown)));
        assert_eq!(err.label(), "degenerate_equation");
        assert!(err.to_string().contains("no unknown"));
    }

    #[test]
    fn out_of_work_message_keeps_the_sentinel_wording() {
        let at = chrono::NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        let err = CoreError::OutOfWork { at };
        assert!(err.to_string().starts_with("Out of Work!"));
    }
}
