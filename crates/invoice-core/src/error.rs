//! Error types for lifecycle and reporting operations.

use invoice_store::StoreError;
use thiserror::Error;

/// Errors that can occur in lifecycle and reporting operations.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// The client name was empty after trimming.
    #[error("client name must not be empty")]
    EmptyClientName,

    /// The underlying store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Result type for lifecycle and reporting operations.
pub type Result<T> = std::result::Result<T, InvoiceError>;
