//! Error types for the reservation admin client

use thiserror::Error;

/// Main error type for configuration and parsing failures
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// A state name outside the known lifecycle
    #[error("Unknown reservation state: {0}")]
    InvalidState(String),

    /// A date/time value that could not be parsed
    #[error("Invalid date/time '{value}': expected RFC 3339 or YYYY-MM-DDTHH:MM[:SS]")]
    InvalidDateTime {
        /// The rejected input
        value: String,
    },
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
