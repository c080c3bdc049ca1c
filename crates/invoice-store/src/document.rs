//! Persisted document shape and conversions.

use bson::oid::ObjectId;
use invoice_models::{Contributor, Invoice, InvoiceStatus};
use serde::{Deserialize, Serialize};

/// Field names used in filters and indexes.
pub const FIELD_MESSAGE_ID: &str = "message_id";
pub const FIELD_STATUS: &str = "status";
pub const FIELD_CREATED_AT: &str = "created_at";
pub const FIELD_UPDATED_AT: &str = "updated_at";

/// `added_by` sub-document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributorDocument {
    pub user_id: i64,
    pub full_name: String,
}

/// One invoice as stored in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub chat_id: i64,
    pub message_id: i32,
    pub client_name: String,
    pub added_by: ContributorDocument,
    pub status: InvoiceStatus,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl From<&Invoice> for InvoiceDocument {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: None,
            chat_id: invoice.chat_id,
            message_id: invoice.message_id,
            client_name: invoice.client_name.clone(),
            added_by: ContributorDocument {
                user_id: invoice.added_by.user_id,
                full_name: invoice.added_by.full_name.clone(),
            },
            status: invoice.status,
            created_at: bson::DateTime::from_chrono(invoice.created_at),
            updated_at: bson::DateTime::from_chrono(invoice.updated_at),
        }
    }
}

impl From<InvoiceDocument> for Invoice {
    fn from(doc: InvoiceDocument) -> Self {
        Self {
            chat_id: doc.chat_id,
            message_id: doc.message_id,
            client_name: doc.client_name,
            added_by: Contributor::new(doc.added_by.user_id, doc.added_by.full_name),
            status: doc.status,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}
