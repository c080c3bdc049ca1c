//! InvoiceStore trait definition.
//!
//! This module defines the repository interface every invoice backend
//! implements. Lookups and status writes are keyed by the originating
//! message id alone; the tracker serves a single group chat.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use invoice_models::{Invoice, InvoiceStatus, NewInvoice};

use crate::error::Result;

/// Trait for invoice storage backends.
///
/// All operations are async to support both local and remote backends.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert a new record with `status = Open` and both timestamps set to now.
    ///
    /// No uniqueness check is performed.
    async fn create(&self, invoice: NewInvoice) -> Result<Invoice>;

    /// All open invoices in insertion order.
    async fn list_open(&self) -> Result<Vec<Invoice>>;

    /// The open invoice created from `message_id`, if any.
    ///
    /// When several open records share the message id the first inserted
    /// one is returned.
    async fn find_open_by_message(&self, message_id: i32) -> Result<Option<Invoice>>;

    /// Write `status` to the first record matching `message_id` and refresh
    /// its `updated_at`.
    ///
    /// The match ignores the current status. Returns `true` if a record
    /// matched.
    async fn set_status(&self, message_id: i32, status: InvoiceStatus) -> Result<bool>;

    /// Write `status` to the first *open* record for `message_id`.
    ///
    /// Terminal records with the same message id are left alone, so a
    /// message that was re-added after being closed transitions its new
    /// record. Returns `true` if an open record matched.
    async fn transition_open(&self, message_id: i32, status: InvoiceStatus) -> Result<bool>;

    /// Records created at or after `since`.
    async fn list_created_since(&self, since: DateTime<Utc>) -> Result<Vec<Invoice>>;

    /// Records in `status` whose `updated_at` is at or after `since`.
    async fn list_with_status_since(
        &self,
        status: InvoiceStatus,
        since: DateTime<Utc>,
    ) -> Result<Vec<Invoice>>;

    /// Mark the record for `message_id` as resolved.
    async fn mark_resolved(&self, message_id: i32) -> Result<bool> {
        self.set_status(message_id, InvoiceStatus::Resolved).await
    }

    /// Mark the record for `message_id` as deleted.
    async fn mark_deleted(&self, message_id: i32) -> Result<bool> {
        self.set_status(message_id, InvoiceStatus::Deleted).await
    }

    /// Invoices resolved at or after `since`.
    async fn list_resolved_since(&self, since: DateTime<Utc>) -> Result<Vec<Invoice>> {
        self.list_with_status_since(InvoiceStatus::Resolved, since)
            .await
    }

    /// Invoices deleted at or after `since`.
    async fn list_deleted_since(&self, since: DateTime<Utc>) -> Result<Vec<Invoice>> {
        self.list_with_status_since(InvoiceStatus::Deleted, since)
            .await
    }
}
