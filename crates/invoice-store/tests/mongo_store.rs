//! Integration tests against a live MongoDB.
//!
//! Skipped unless `INVOICE_TEST_MONGO_URI` points at a server. Each run uses
//! its own collection and drops it afterwards.

use chrono::{Duration, Utc};
use futures::TryStreamExt;
use invoice_models::{Contributor, InvoiceStatus, NewInvoice};
use invoice_store::{InvoiceStore, MongoInvoiceStore};

const URI_ENV: &str = "INVOICE_TEST_MONGO_URI";

async fn test_store(name: &str) -> Option<(MongoInvoiceStore, mongodb::Collection<bson::Document>)> {
    let uri = std::env::var(URI_ENV).ok()?;
    let collection = format!("invoices_test_{}_{}", name, std::process::id());
    let store = MongoInvoiceStore::connect(&uri, "invoice_tests", &collection)
        .await
        .unwrap();
    let raw = mongodb::Client::with_uri_str(&uri)
        .await
        .unwrap()
        .database("invoice_tests")
        .collection::<bson::Document>(&collection);
    Some((store, raw))
}

fn anna(message_id: i32, client: &str) -> NewInvoice {
    NewInvoice::new(100, message_id, client, Contributor::new(5, "Anna"))
}

#[tokio::test]
async fn test_lifecycle_round_trip() {
    let Some((store, raw)) = test_store("lifecycle").await else {
        eprintln!("{} not set, skipping", URI_ENV);
        return;
    };
    let day_start = Utc::now() - Duration::minutes(1);

    store.create(anna(1, "Ivanov")).await.unwrap();
    store.create(anna(2, "Petrov")).await.unwrap();

    let open = store.list_open().await.unwrap();
    assert_eq!(open.len(), 2);
    assert_eq!(open[0].client_name, "Ivanov");
    assert_eq!(open[1].client_name, "Petrov");

    assert!(store.mark_resolved(1).await.unwrap());
    assert!(store.find_open_by_message(1).await.unwrap().is_none());

    let resolved = store.list_resolved_since(day_start).await.unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].added_by.user_id, 5);
    assert_eq!(resolved[0].status, InvoiceStatus::Resolved);

    assert!(!store.mark_deleted(404).await.unwrap());
    assert_eq!(store.list_created_since(day_start).await.unwrap().len(), 2);

    raw.drop().await.unwrap();
}

#[tokio::test]
async fn test_stored_status_values() {
    let Some((store, raw)) = test_store("status").await else {
        eprintln!("{} not set, skipping", URI_ENV);
        return;
    };

    store.create(anna(9, "Sidorov")).await.unwrap();
    store.mark_deleted(9).await.unwrap();

    let doc = raw
        .find_one(bson::doc! { "message_id": 9 })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.get_str("status").unwrap(), "deleted");
    assert!(doc.get_datetime("updated_at").unwrap() >= doc.get_datetime("created_at").unwrap());

    raw.drop().await.unwrap();
}

#[tokio::test]
async fn test_transition_open_targets_the_open_record() {
    let Some((store, raw)) = test_store("reopen").await else {
        eprintln!("{} not set, skipping", URI_ENV);
        return;
    };

    store.create(anna(5, "Ivanov")).await.unwrap();
    assert!(store.transition_open(5, InvoiceStatus::Deleted).await.unwrap());
    store.create(anna(5, "Ivanov")).await.unwrap();

    assert!(store.transition_open(5, InvoiceStatus::Resolved).await.unwrap());
    assert!(store.list_open().await.unwrap().is_empty());
    assert!(!store.transition_open(5, InvoiceStatus::Deleted).await.unwrap());

    let statuses: Vec<String> = raw
        .find(bson::doc! { "message_id": 5 })
        .sort(bson::doc! { "_id": 1 })
        .await
        .unwrap()
        .try_collect::<Vec<bson::Document>>()
        .await
        .unwrap()
        .iter()
        .map(|d| d.get_str("status").unwrap().to_string())
        .collect();
    assert_eq!(statuses, vec!["deleted", "resolved"]);

    raw.drop().await.unwrap();
}
