//! Core data models for the invoice tracker.
//!
//! An invoice is a client service request posted to the team chat as a
//! photo with a caption. This crate holds the record types shared by the
//! store, the lifecycle logic and the Telegram front end.

pub mod invoice;

pub use invoice::{Contributor, Invoice, InvoiceStatus, NewInvoice};
