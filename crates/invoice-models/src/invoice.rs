//! Invoice types.
//!
//! Invoices are keyed externally by the `(chat_id, message_id)` pair of the
//! chat message they were created from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an invoice.
///
/// `Open` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Waiting to be handled.
    #[default]
    Open,
    /// Handled by the team.
    Resolved,
    /// Withdrawn from the list.
    Deleted,
}

impl InvoiceStatus {
    /// The value persisted in the `status` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Open => "open",
            InvoiceStatus::Resolved => "resolved",
            InvoiceStatus::Deleted => "deleted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvoiceStatus::Open)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The chat member who registered an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub user_id: i64,
    pub full_name: String,
}

impl Contributor {
    pub fn new(user_id: i64, full_name: impl Into<String>) -> Self {
        Self {
            user_id,
            full_name: full_name.into(),
        }
    }
}

/// Input for creating an invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    /// Chat the originating message lives in.
    pub chat_id: i64,
    /// Originating message id within that chat.
    pub message_id: i32,
    /// Label shown in listings.
    pub client_name: String,
    /// Who registered it.
    pub added_by: Contributor,
}

impl NewInvoice {
    pub fn new(
        chat_id: i64,
        message_id: i32,
        client_name: impl Into<String>,
        added_by: Contributor,
    ) -> Self {
        Self {
            chat_id,
            message_id,
            client_name: client_name.into(),
            added_by,
        }
    }

    /// Materializes the record as it is first persisted.
    pub fn into_invoice(self, now: DateTime<Utc>) -> Invoice {
        Invoice {
            chat_id: self.chat_id,
            message_id: self.message_id,
            client_name: self.client_name,
            added_by: self.added_by,
            status: InvoiceStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A tracked client service request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub chat_id: i64,
    pub message_id: i32,
    pub client_name: String,
    /// Immutable after creation.
    pub added_by: Contributor,
    #[serde(default)]
    pub status: InvoiceStatus,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every status write.
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn is_open(&self) -> bool {
        self.status == InvoiceStatus::Open
    }

    /// Applies a status write, refreshing `updated_at`.
    ///
    /// The current status is not consulted, so a terminal invoice can be
    /// moved to the other terminal state.
    pub fn set_status(&mut self, status: InvoiceStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}
