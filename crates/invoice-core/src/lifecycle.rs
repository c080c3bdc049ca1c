//! Invoice lifecycle transitions.
//!
//! `Open -> Resolved` and `Open -> Deleted` are the only transitions. Every
//! operation looks the invoice up among open records first, so acting on a
//! message that has no open invoice is a silent no-op.

use std::sync::Arc;

use invoice_models::{Contributor, Invoice, InvoiceStatus, NewInvoice};
use invoice_store::InvoiceStore;
use tracing::{debug, info};

use crate::error::{InvoiceError, Result};

/// Result of [`LifecycleManager::add_invoice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new open invoice was stored.
    Created(Invoice),
    /// The message already backs an open invoice in the same chat; nothing
    /// was inserted.
    AlreadyOpen(Invoice),
}

impl AddOutcome {
    pub fn invoice(&self) -> &Invoice {
        match self {
            AddOutcome::Created(invoice) | AddOutcome::AlreadyOpen(invoice) => invoice,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, AddOutcome::Created(_))
    }
}

/// Applies lifecycle transitions through an injected store.
#[derive(Clone)]
pub struct LifecycleManager {
    store: Arc<dyn InvoiceStore>,
}

impl LifecycleManager {
    pub fn new(store: Arc<dyn InvoiceStore>) -> Self {
        Self { store }
    }

    /// Register the message `(chat_id, message_id)` as an open invoice.
    ///
    /// The client name is trimmed and must not be empty.
    pub async fn add_invoice(
        &self,
        chat_id: i64,
        message_id: i32,
        client_name: &str,
        contributor: Contributor,
    ) -> Result<AddOutcome> {
        let client_name = client_name.trim();
        if client_name.is_empty() {
            return Err(InvoiceError::EmptyClientName);
        }

        // Read-then-write: two concurrent adds can still both insert.
        if let Some(existing) = self.store.find_open_by_message(message_id).await? {
            if existing.chat_id == chat_id {
                debug!(chat_id, message_id, "Invoice already open for message");
                return Ok(AddOutcome::AlreadyOpen(existing));
            }
        }

        let invoice = self
            .store
            .create(NewInvoice::new(chat_id, message_id, client_name, contributor))
            .await?;
        info!(
            chat_id,
            message_id,
            client = %invoice.client_name,
            user_id = invoice.added_by.user_id,
            "Invoice added"
        );
        Ok(AddOutcome::Created(invoice))
    }

    /// Current open invoices in listing order.
    pub async fn list_open(&self) -> Result<Vec<Invoice>> {
        Ok(self.store.list_open().await?)
    }

    /// Resolve the open invoice for `message_id`.
    ///
    /// Returns the invoice as it was before the transition, or `None` when
    /// there was nothing open to resolve.
    pub async fn resolve_invoice(&self, message_id: i32) -> Result<Option<Invoice>> {
        let Some(invoice) = self.store.find_open_by_message(message_id).await? else {
            debug!(message_id, "No open invoice to resolve");
            return Ok(None);
        };
        if !self.store.transition_open(message_id, InvoiceStatus::Resolved).await? {
            debug!(message_id, "Invoice closed concurrently");
            return Ok(None);
        }
        info!(message_id, client = %invoice.client_name, "Invoice resolved");
        Ok(Some(invoice))
    }

    /// Delete the open invoice for `message_id`.
    pub async fn delete_invoice(&self, message_id: i32) -> Result<Option<Invoice>> {
        let Some(invoice) = self.store.find_open_by_message(message_id).await? else {
            debug!(message_id, "No open invoice to delete");
            return Ok(None);
        };
        if !self.store.transition_open(message_id, InvoiceStatus::Deleted).await? {
            debug!(message_id, "Invoice closed concurrently");
            return Ok(None);
        }
        info!(message_id, client = %invoice.client_name, "Invoice deleted");
        Ok(Some(invoice))
    }

    /// Delete the invoice at 1-based `position` in a freshly fetched open
    /// listing.
    ///
    /// Positions refer to this fetch only; a listing the user saw earlier
    /// may have shifted since. Out-of-range positions are ignored.
    pub async fn delete_at_position(&self, position: usize) -> Result<Option<Invoice>> {
        let open = self.store.list_open().await?;
        let Some(invoice) = position.checked_sub(1).and_then(|idx| open.into_iter().nth(idx))
        else {
            debug!(position, "Position outside open listing");
            return Ok(None);
        };
        if !self
            .store
            .transition_open(invoice.message_id, InvoiceStatus::Deleted)
            .await?
        {
            debug!(position, "Listed invoice closed concurrently");
            return Ok(None);
        }
        info!(
            position,
            message_id = invoice.message_id,
            client = %invoice.client_name,
            "Invoice deleted by position"
        );
        Ok(Some(invoice))
    }
}
