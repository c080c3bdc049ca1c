//! MongoDB backend for invoice storage.
//!
//! Requires a reachable MongoDB server. Records live in a single
//! collection (default `data.invoices`) using the shape of
//! [`InvoiceDocument`].

use async_trait::async_trait;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use invoice_models::{Invoice, InvoiceStatus, NewInvoice};
use mongodb::{Client, Collection, IndexModel};
use tracing::{debug, info};

use crate::document::{
    InvoiceDocument, FIELD_CREATED_AT, FIELD_MESSAGE_ID, FIELD_STATUS, FIELD_UPDATED_AT,
};
use crate::error::{Result, StoreError};
use crate::store::InvoiceStore;

/// Default database name.
pub const DEFAULT_DATABASE: &str = "data";

/// Default collection name.
pub const DEFAULT_COLLECTION: &str = "invoices";

/// MongoDB-based invoice store.
#[derive(Clone)]
pub struct MongoInvoiceStore {
    collection: Collection<InvoiceDocument>,
}

impl MongoInvoiceStore {
    /// Connect, ping the server and make sure the query indexes exist.
    ///
    /// Fails if the server cannot be reached.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        if uri.trim().is_empty() {
            return Err(StoreError::ConfigError("empty MongoDB URI".to_string()));
        }

        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }).await?;
        info!(database = %database, collection = %collection, "Connected to MongoDB");

        let store = Self {
            collection: db.collection(collection),
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { FIELD_MESSAGE_ID: 1, FIELD_STATUS: 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { FIELD_CREATED_AT: 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { FIELD_STATUS: 1, FIELD_UPDATED_AT: 1 })
                .build(),
        ];
        self.collection.create_indexes(indexes).await?;
        debug!("Invoice indexes ensured");
        Ok(())
    }

    /// Run `filter` and collect the results in insertion order.
    async fn find_all(&self, filter: Document) -> Result<Vec<Invoice>> {
        let cursor = self.collection.find(filter).sort(doc! { "_id": 1 }).await?;
        let docs: Vec<InvoiceDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Invoice::from).collect())
    }
}

#[async_trait]
impl InvoiceStore for MongoInvoiceStore {
    async fn create(&self, invoice: NewInvoice) -> Result<Invoice> {
        let invoice = invoice.into_invoice(Utc::now());
        let result = self
            .collection
            .insert_one(InvoiceDocument::from(&invoice))
            .await?;
        debug!(
            id = %result.inserted_id,
            message_id = invoice.message_id,
            "Inserted invoice document"
        );
        Ok(invoice)
    }

    async fn list_open(&self) -> Result<Vec<Invoice>> {
        self.find_all(doc! { FIELD_STATUS: InvoiceStatus::Open.as_str() })
            .await
    }

    async fn find_open_by_message(&self, message_id: i32) -> Result<Option<Invoice>> {
        let found = self
            .collection
            .find_one(doc! {
                FIELD_MESSAGE_ID: message_id,
                FIELD_STATUS: InvoiceStatus::Open.as_str(),
            })
            .sort(doc! { "_id": 1 })
            .await?;
        Ok(found.map(Invoice::from))
    }

    async fn set_status(&self, message_id: i32, status: InvoiceStatus) -> Result<bool> {
        let now = bson::DateTime::from_chrono(Utc::now());
        let result = self
            .collection
            .update_one(
                doc! { FIELD_MESSAGE_ID: message_id },
                doc! { "$set": { FIELD_STATUS: status.as_str(), FIELD_UPDATED_AT: now } },
            )
            .await?;
        debug!(
            message_id,
            status = %status,
            matched = result.matched_count,
            "Invoice status written"
        );
        Ok(result.matched_count > 0)
    }

    async fn transition_open(&self, message_id: i32, status: InvoiceStatus) -> Result<bool> {
        let now = bson::DateTime::from_chrono(Utc::now());
        let previous = self
            .collection
            .find_one_and_update(
                doc! {
                    FIELD_MESSAGE_ID: message_id,
                    FIELD_STATUS: InvoiceStatus::Open.as_str(),
                },
                doc! { "$set": { FIELD_STATUS: status.as_str(), FIELD_UPDATED_AT: now } },
            )
            .sort(doc! { "_id": 1 })
            .await?;
        debug!(
            message_id,
            status = %status,
            matched = previous.is_some(),
            "Open invoice transitioned"
        );
        Ok(previous.is_some())
    }

    async fn list_created_since(&self, since: DateTime<Utc>) -> Result<Vec<Invoice>> {
        self.find_all(doc! {
            FIELD_CREATED_AT: { "$gte": bson::DateTime::from_chrono(since) },
        })
        .await
    }

    async fn list_with_status_since(
        &self,
        status: InvoiceStatus,
        since: DateTime<Utc>,
    ) -> Result<Vec<Invoice>> {
        self.find_all(doc! {
            FIELD_STATUS: status.as_str(),
            FIELD_UPDATED_AT: { "$gte": bson::DateTime::from_chrono(since) },
        })
        .await
    }
}
