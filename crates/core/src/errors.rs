//! Error taxonomy shared across the viasync crates.

use thiserror::Error;

/// Result type alias for viasync operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by report stores and the sync engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The backing store could not be reached. Fatal for the current sync
    /// pass; never retried automatically.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store rejected a write (constraint violation).
    #[error("Write rejected: {0}")]
    WriteRejected(String),

    /// No record with the given id exists in the store.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything that does not fit the store taxonomy.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Create a store-unavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Create a write-rejected error.
    pub fn write_rejected(message: impl Into<String>) -> Self {
        Self::WriteRejected(message.into())
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}
