//! Storage error types and their mapping into the core taxonomy.

use diesel::result::DatabaseErrorKind;
use thiserror::Error;

use viasync_core::errors::Error;

/// Errors produced by the SQLite storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Query or statement error
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    /// Migration failure at startup
    #[error("Migration error: {0}")]
    Migration(String),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Database(diesel::result::Error::NotFound) => {
                Error::NotFound("record not found".to_string())
            }
            StorageError::Database(diesel::result::Error::DatabaseError(kind, info)) => {
                match kind {
                    DatabaseErrorKind::UniqueViolation
                    | DatabaseErrorKind::ForeignKeyViolation
                    | DatabaseErrorKind::NotNullViolation
                    | DatabaseErrorKind::CheckViolation => {
                        Error::WriteRejected(info.message().to_string())
                    }
                    _ => Error::Unexpected(info.message().to_string()),
                }
            }
            StorageError::Database(other) => Error::Unexpected(other.to_string()),
            StorageError::Pool(err) => Error::StoreUnavailable(err.to_string()),
            StorageError::Migration(message) => Error::StoreUnavailable(message),
        }
    }
}
