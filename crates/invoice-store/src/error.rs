//! Error types for store operations.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The document database rejected or failed the operation.
    #[error("database error: {0}")]
    DatabaseError(String),

    /// Invalid connection settings.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
