//! Error types for refetch
//!
//! These errors cover building a retrying fetch, never the outcome of a
//! retried call: a failed call returns the transport's own error value,
//! untouched.

use refetch_transport::TransportError;
use thiserror::Error;

/// Result type alias for refetch construction and configuration.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up a retrying fetch.
#[derive(Debug, Error)]
pub enum Error {
    /// The default transport could not be created.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Retry settings were invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Invalid retry settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A setting could not be parsed.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Name of the setting (environment variable or field)
        key: String,
        /// The rejected value
        value: String,
    },
}

impl ConfigError {
    /// Create an invalid-value error.
    pub fn invalid_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }
}
