//! Core error types for lapwatch-core.
//!
//! The tracker, the tick source and the calculator each return their own
//! small error enum. [`CoreError`] covers configuration storage and IO.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for lapwatch-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors returned by [`TimeTracker`](crate::tracker::TimeTracker) transitions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerError {
    /// `start()` on a countdown with no usable duration.
    /// No state was changed.
    #[error("countdown duration is not set; enter minutes and/or seconds first")]
    InvalidConfiguration,
}

/// Errors returned by the periodic tick source.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerError {
    #[error("tick period must be greater than zero")]
    ZeroPeriod,
}

/// Errors returned by the calculator and its date/time helpers.
/// None of them changes calculator state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("select a base date (YYYY-MM-DD), got '{0}'")]
    InvalidDate(String),

    #[error("enter a number of days, got '{0}'")]
    InvalidDays(String),

    #[error("resulting date is out of range")]
    DateOutOfRange,

    #[error("end time is more than a day before start time")]
    NegativeDuration,
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

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
