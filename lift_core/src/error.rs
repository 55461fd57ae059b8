//! Error types for the lift_core library.

use std::io;
use uuid::Uuid;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lift_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected numeric input (1RM estimation, record updates)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No personal record with this id
    #[error("Personal record {0} not found")]
    RecordNotFound(Uuid),

    /// A point lookup expected at most one record but found several
    #[error("Found {count} personal records for '{exercise}', expected at most one")]
    AmbiguousRecord { exercise: String, count: usize },

    /// Personal record store failure
    #[error("Record store error: {0}")]
    Store(String),

    /// Persisted data that cannot be read back; needs manual repair
    #[error("Corrupt data: {0}")]
    Corrupt(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the user can simply re-issue the failed operation.
    ///
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Store(_))
    }
}
