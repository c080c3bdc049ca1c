//! Error types for the Telegram bot.

use invoice_core::{ConfigError, InvoiceError};
use invoice_store::StoreError;
use thiserror::Error;

/// Errors that can occur in the Telegram bot.
#[derive(Debug, Error)]
pub enum BotError {
    /// Startup configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Failed to start the bot.
    #[error("Failed to start bot: {0}")]
    BotStartFailed(String),

    /// A Telegram API call failed.
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// The invoice store could not be reached or failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A lifecycle or reporting operation failed.
    #[error("invoice error: {0}")]
    Invoice(#[from] InvoiceError),
}

/// Result type for bot operations.
pub type Result<T> = std::result::Result<T, BotError>;
