//! Error handling for sensor-replay
//!
//! This module defines the error type shared by the loader, the channel
//! backends and the replay publisher, plus a Result alias.

use thiserror::Error;

/// Main error type for sensor-replay operations
#[derive(Error, Debug)]
pub enum ReplayError {
    /// Errors related to configuration loading/validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors raised by the CSV reader (ragged rows, bad UTF-8, ...)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is not present in the header row
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A cell could not be interpreted for its column
    #[error("Malformed record at row {row}, column '{column}': {message}")]
    MalformedRecord {
        row: usize,
        column: String,
        message: String,
    },

    /// Errors related to the publish/subscribe channel
    #[error("Channel error: {0}")]
    Channel(String),

    /// Broker did not acknowledge the connection in time
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Errors raised by the diagnostic plot window
    #[error("Plot error: {0}")]
    Plot(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ReplayError>,
    },
}

impl ReplayError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ReplayError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a channel error from an MQTT client error
    pub fn from_client_error(err: rumqttc::ClientError) -> Self {
        ReplayError::Channel(err.to_string())
    }
}

impl From<rumqttc::ClientError> for ReplayError {
    fn from(err: rumqttc::ClientError) -> Self {
        ReplayError::from_client_error(err)
    }
}

/// Result type alias for sensor-replay operations
pub type Result<T> = std::result::Result<T, ReplayError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
