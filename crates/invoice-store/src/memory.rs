//! In-process invoice store for development and testing.
//!
//! Keeps records in a vector so insertion order is the listing order, the
//! same order the MongoDB backend produces by sorting on `_id`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use invoice_models::{Invoice, InvoiceStatus, NewInvoice};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::store::InvoiceStore;

/// Source of "now" for timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// In-memory invoice store.
pub struct MemoryInvoiceStore {
    invoices: RwLock<Vec<Invoice>>,
    clock: Clock,
}

impl Default for MemoryInvoiceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryInvoiceStore {
    /// Create an empty store stamping records with the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(Utc::now))
    }

    /// Create an empty store with a custom clock.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            invoices: RwLock::new(Vec::new()),
            clock,
        }
    }

    /// Copy of every record regardless of status.
    pub async fn snapshot(&self) -> Vec<Invoice> {
        self.invoices.read().await.clone()
    }

    /// Number of records regardless of status.
    pub async fn len(&self) -> usize {
        self.invoices.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.invoices.read().await.is_empty()
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

#[async_trait]
impl InvoiceStore for MemoryInvoiceStore {
    async fn create(&self, invoice: NewInvoice) -> Result<Invoice> {
        let invoice = invoice.into_invoice(self.now());
        debug!(
            chat_id = invoice.chat_id,
            message_id = invoice.message_id,
            "Storing invoice"
        );
        self.invoices.write().await.push(invoice.clone());
        Ok(invoice)
    }

    async fn list_open(&self) -> Result<Vec<Invoice>> {
        let invoices = self.invoices.read().await;
        Ok(invoices.iter().filter(|i| i.is_open()).cloned().collect())
    }

    async fn find_open_by_message(&self, message_id: i32) -> Result<Option<Invoice>> {
        let invoices = self.invoices.read().await;
        Ok(invoices
            .iter()
            .find(|i| i.message_id == message_id && i.is_open())
            .cloned())
    }

    async fn set_status(&self, message_id: i32, status: InvoiceStatus) -> Result<bool> {
        let now = self.now();
        let mut invoices = self.invoices.write().await;
        match invoices.iter_mut().find(|i| i.message_id == message_id) {
            Some(invoice) => {
                invoice.set_status(status, now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn transition_open(&self, message_id: i32, status: InvoiceStatus) -> Result<bool> {
        let now = self.now();
        let mut invoices = self.invoices.write().await;
        match invoices
            .iter_mut()
            .find(|i| i.message_id == message_id && i.is_open())
        {
            Some(invoice) => {
                invoice.set_status(status, now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_created_since(&self, since: DateTime<Utc>) -> Result<Vec<Invoice>> {
        let invoices = self.invoices.read().await;
        Ok(invoices
            .iter()
            .filter(|i| i.created_at >= since)
            .cloned()
            .collect())
    }

    async fn list_with_status_since(
        &self,
        status: InvoiceStatus,
        since: DateTime<Utc>,
    ) -> Result<Vec<Invoice>> {
        let invoices = self.invoices.read().await;
        Ok(invoices
            .iter()
            .filter(|i| i.status == status && i.updated_at >= since)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use invoice_models::Contributor;
    use std::sync::Mutex;

    /// Clock that advances one minute per reading.
    fn stepping_clock(start: DateTime<Utc>) -> Clock {
        let current = Mutex::new(start);
        Arc::new(move || {
            let mut now = current.lock().unwrap();
            let value = *now;
            *now = value + Duration::minutes(1);
            value
        })
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    fn new_invoice(message_id: i32, client: &str) -> NewInvoice {
        NewInvoice::new(100, message_id, client, Contributor::new(5, "Anna"))
    }

    #[tokio::test]
    async fn test_create_and_list_open_in_insertion_order() {
        let store = MemoryInvoiceStore::new();
        store.create(new_invoice(3, "Petrov")).await.unwrap();
        store.create(new_invoice(1, "Ivanov")).await.unwrap();
        store.create(new_invoice(2, "Sidorov")).await.unwrap();

        let open = store.list_open().await.unwrap();
        let names: Vec<_> = open.iter().map(|i| i.client_name.as_str()).collect();
        assert_eq!(names, vec!["Petrov", "Ivanov", "Sidorov"]);
        assert!(open.iter().all(|i| i.is_open()));
    }

    #[tokio::test]
    async fn test_find_open_skips_terminal_records() {
        let store = MemoryInvoiceStore::new();
        store.create(new_invoice(1, "Ivanov")).await.unwrap();

        assert!(store.find_open_by_message(1).await.unwrap().is_some());
        assert!(store.mark_resolved(1).await.unwrap());
        assert!(store.find_open_by_message(1).await.unwrap().is_none());
        assert!(store.list_open().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_status_unknown_message_matches_nothing() {
        let store = MemoryInvoiceStore::new();
        store.create(new_invoice(1, "Ivanov")).await.unwrap();

        assert!(!store.mark_deleted(99).await.unwrap());
        let all = store.snapshot().await;
        assert_eq!(all.len(), 1);
        assert!(all[0].is_open());
    }

    #[tokio::test]
    async fn test_mark_resolved_twice_only_moves_updated_at() {
        let store = MemoryInvoiceStore::with_clock(stepping_clock(start()));
        store.create(new_invoice(1, "Ivanov")).await.unwrap();

        store.mark_resolved(1).await.unwrap();
        let first = store.snapshot().await[0].clone();
        store.mark_resolved(1).await.unwrap();
        let second = store.snapshot().await[0].clone();

        assert_eq!(first.status, InvoiceStatus::Resolved);
        assert_eq!(second.status, InvoiceStatus::Resolved);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(second.created_at, first.created_at);
    }

    #[tokio::test]
    async fn test_status_write_ignores_current_status() {
        let store = MemoryInvoiceStore::new();
        store.create(new_invoice(1, "Ivanov")).await.unwrap();

        store.mark_deleted(1).await.unwrap();
        store.mark_resolved(1).await.unwrap();

        assert_eq!(store.snapshot().await[0].status, InvoiceStatus::Resolved);
    }

    #[tokio::test]
    async fn test_transition_open_skips_closed_records() {
        let store = MemoryInvoiceStore::new();
        store.create(new_invoice(1, "Ivanov")).await.unwrap();
        store.mark_deleted(1).await.unwrap();
        store.create(new_invoice(1, "Ivanov")).await.unwrap();

        assert!(store.transition_open(1, InvoiceStatus::Resolved).await.unwrap());
        let statuses: Vec<_> = store.snapshot().await.iter().map(|i| i.status).collect();
        assert_eq!(statuses, vec![InvoiceStatus::Deleted, InvoiceStatus::Resolved]);

        assert!(!store.transition_open(1, InvoiceStatus::Deleted).await.unwrap());
    }

    #[tokio::test]
    async fn test_since_filters() {
        let store = MemoryInvoiceStore::with_clock(stepping_clock(start()));
        // created at 08:00, 08:01, 08:02
        store.create(new_invoice(1, "Ivanov")).await.unwrap();
        store.create(new_invoice(2, "Petrov")).await.unwrap();
        store.create(new_invoice(3, "Sidorov")).await.unwrap();
        // resolved at 08:03, deleted at 08:04
        store.mark_resolved(1).await.unwrap();
        store.mark_deleted(2).await.unwrap();

        let boundary = start() + Duration::minutes(1);
        assert_eq!(store.list_created_since(boundary).await.unwrap().len(), 2);
        assert_eq!(store.list_created_since(start()).await.unwrap().len(), 3);

        let resolved = store.list_resolved_since(boundary).await.unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].message_id, 1);

        let deleted = store.list_deleted_since(boundary).await.unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].message_id, 2);

        let late = start() + Duration::minutes(10);
        assert!(store.list_resolved_since(late).await.unwrap().is_empty());
        assert!(store.list_deleted_since(late).await.unwrap().is_empty());
    }
}
