//! Telegram front end for the invoice tracker.
//!
//! Group members post invoice photos with the client name as caption; the
//! bot keeps them in an open list until someone replies with a resolve
//! marker or deletes them, and reports daily totals per contributor.
//!
//! # Commands
//!
//! - `/list` - open invoices with links to the original messages
//! - `/add [client]` - reply to a photo to register it
//! - `/del` - reply to an invoice, or `/del <n>` for the n-th listed one
//! - `/report` - today's totals, privileged users only
//! - `/help` - usage
//!
//! Inbound messages become [`InboundEvent`]s, are checked against the
//! [`AccessPolicy`], classified into an [`Intent`] and handled by the
//! [`InvoiceDispatcher`]. All outbound traffic goes through [`ChatActions`].

pub mod access;
pub mod bot;
pub mod chat;
pub mod error;
pub mod event;
pub mod handlers;
pub mod render;
pub mod rollover;

pub use access::{AccessDecision, AccessPolicy};
pub use bot::InvoiceBot;
pub use chat::{ChatActions, TeloxideChat};
pub use error::{BotError, Result};
pub use event::{ChatKind, InboundEvent, RepliedMessage, Sender};
pub use handlers::{classify, Command, DeleteTarget, Intent, InvoiceDispatcher};
pub use rollover::DailyRollover;
