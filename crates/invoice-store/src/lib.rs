//! Invoice persistence.
//!
//! Every operation is a single round trip against one collection. There are
//! no transactions and no retries beyond what the driver does itself.
//!
//! Backends:
//!
//! - **MongoInvoiceStore**: MongoDB collection, used in production
//! - **MemoryInvoiceStore**: in-process list, used by tests and local runs
//!
//! # Example
//!
//! ```no_run
//! use invoice_models::{Contributor, NewInvoice};
//! use invoice_store::{InvoiceStore, MongoInvoiceStore};
//!
//! # async fn example() -> invoice_store::Result<()> {
//! let store = MongoInvoiceStore::connect("mongodb://localhost:27017", "data", "invoices").await?;
//!
//! store
//!     .create(NewInvoice::new(-1001, 17, "Ivanov", Contributor::new(5, "Anna")))
//!     .await?;
//!
//! for invoice in store.list_open().await? {
//!     println!("{} ({})", invoice.client_name, invoice.message_id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod memory;
pub mod mongo;
pub mod store;

pub use document::InvoiceDocument;
pub use error::{Result, StoreError};
pub use memory::MemoryInvoiceStore;
pub use mongo::MongoInvoiceStore;
pub use store::InvoiceStore;
