//! Intent classification and handling for inbound messages.

use std::sync::Arc;

use chrono::{Timelike, Utc};
use invoice_core::{
    AddOutcome, BotConfig, LifecycleManager, ReportAggregator, ReportClock,
    DEFAULT_RESOLVE_MARKERS,
};
use invoice_store::InvoiceStore;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use crate::access::{AccessDecision, AccessPolicy};
use crate::chat::ChatActions;
use crate::error::Result;
use crate::event::InboundEvent;
use crate::render;

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Show open invoices")]
    List,

    #[command(description = "Add an invoice: reply to the photo with /add [client]")]
    Add(String),

    #[command(description = "Delete an invoice: reply with /del or use /del <number>")]
    Del(String),

    #[command(description = "Today's report (administrators only)")]
    Report,

    #[command(description = "Show help message")]
    Help,
}

impl Command {
    /// Parse a command from message text.
    ///
    /// Argument-less commands are still recognised when trailing text
    /// follows them, e.g. `/list please`.
    pub fn parse_lenient(text: &str, bot_username: &str) -> Option<Self> {
        if let Ok(cmd) = Self::parse(text, bot_username) {
            return Some(cmd);
        }
        let head = text.split_whitespace().next()?;
        Self::parse(head, bot_username).ok()
    }
}

/// What to do with a delete command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    /// The replied-to message.
    Reply(i32),
    /// 1-based position in the current open listing.
    Position(usize),
    /// Neither a reply nor a usable number.
    Invalid,
}

/// Classified meaning of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    List,
    /// Explicit add; carries the trailing command text.
    Add(String),
    Report,
    Delete(DeleteTarget),
    Help,
    /// Resolve the invoice backed by this message id.
    Resolve(i32),
    /// Photo with caption; carries the caption as client name.
    AutoAdd(String),
    Ignore,
}

/// Classify an event. Explicit commands win over resolve-marker replies,
/// which win over implicit photo submissions.
pub fn classify(event: &InboundEvent, bot_username: &str, markers: &[String]) -> Intent {
    if let Some(cmd) = event
        .command_source()
        .and_then(|text| Command::parse_lenient(text, bot_username))
    {
        return match cmd {
            Command::List => Intent::List,
            Command::Add(arg) => Intent::Add(arg),
            Command::Report => Intent::Report,
            Command::Help => Intent::Help,
            Command::Del(arg) => Intent::Delete(delete_target(event, &arg)),
        };
    }

    if let (Some(reply), Some(text)) = (&event.reply_to, event.text.as_deref()) {
        if markers.iter().any(|m| text.contains(m.as_str())) {
            return Intent::Resolve(reply.message_id);
        }
    }

    if event.has_photo {
        if let Some(caption) = event.caption.as_deref().map(str::trim) {
            if !caption.is_empty() {
                return Intent::AutoAdd(caption.to_string());
            }
        }
    }

    Intent::Ignore
}

fn delete_target(event: &InboundEvent, arg: &str) -> DeleteTarget {
    if let Some(reply) = &event.reply_to {
        return DeleteTarget::Reply(reply.message_id);
    }
    arg.split_whitespace()
        .next()
        .and_then(|raw| raw.parse::<usize>().ok())
        .map(DeleteTarget::Position)
        .unwrap_or(DeleteTarget::Invalid)
}

/// Routes inbound events to the lifecycle manager and report aggregator.
#[derive(Clone)]
pub struct InvoiceDispatcher {
    lifecycle: LifecycleManager,
    reports: ReportAggregator,
    access: AccessPolicy,
    clock: ReportClock,
    chat: Arc<dyn ChatActions>,
    bot_username: String,
    resolve_markers: Vec<String>,
}

impl InvoiceDispatcher {
    pub fn new(store: Arc<dyn InvoiceStore>, chat: Arc<dyn ChatActions>) -> Self {
        Self {
            lifecycle: LifecycleManager::new(store.clone()),
            reports: ReportAggregator::new(store),
            access: AccessPolicy::default(),
            clock: ReportClock::default(),
            chat,
            bot_username: String::new(),
            resolve_markers: DEFAULT_RESOLVE_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Dispatcher configured from validated settings.
    pub fn from_config(
        config: &BotConfig,
        store: Arc<dyn InvoiceStore>,
        chat: Arc<dyn ChatActions>,
    ) -> Self {
        Self::new(store, chat)
            .with_access(AccessPolicy::from_config(config))
            .with_clock(ReportClock::new(config.timezone))
            .with_resolve_markers(config.resolve_markers.clone())
    }

    pub fn with_access(mut self, access: AccessPolicy) -> Self {
        self.access = access;
        self
    }

    pub fn with_clock(mut self, clock: ReportClock) -> Self {
        self.clock = clock;
        self
    }

    /// Username used to match `/cmd@botname`.
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = username.into();
        self
    }

    pub fn with_resolve_markers(mut self, markers: Vec<String>) -> Self {
        self.resolve_markers = markers;
        self
    }

    /// Handle one inbound event. Failures are logged, never propagated,
    /// so one bad message cannot stop the update loop.
    pub async fn handle(&self, event: InboundEvent) {
        let chat_id = event.chat_id;
        let message_id = event.message_id;
        if let Err(e) = self.dispatch(event).await {
            warn!(chat_id, message_id, error = %e, "Failed to handle message");
        }
    }

    async fn dispatch(&self, event: InboundEvent) -> Result<()> {
        match self
            .access
            .check(event.chat_kind, event.chat_id, event.sender.user_id)
        {
            AccessDecision::Allowed => {}
            AccessDecision::DeniedPrivate => {
                info!(user_id = event.sender.user_id, "Private chat from unlisted user");
                return self.chat.send_text(event.chat_id, render::ACCESS_DENIED).await;
            }
            AccessDecision::ForeignChat => {
                info!(chat_id = event.chat_id, "Leaving foreign chat");
                return self.chat.leave_chat(event.chat_id).await;
            }
        }

        let intent = classify(&event, &self.bot_username, &self.resolve_markers);
        debug!(chat_id = event.chat_id, message_id = event.message_id, ?intent, "Message classified");

        match intent {
            Intent::List => self.handle_list(&event).await,
            Intent::Add(arg) => self.handle_add(&event, &arg).await,
            Intent::Report => self.handle_report(&event).await,
            Intent::Delete(target) => self.handle_delete(&event, target).await,
            Intent::Help => self.handle_help(&event).await,
            Intent::Resolve(message_id) => {
                self.lifecycle.resolve_invoice(message_id).await?;
                Ok(())
            }
            Intent::AutoAdd(client_name) => self.handle_auto_add(&event, &client_name).await,
            Intent::Ignore => Ok(()),
        }
    }

    async fn handle_list(&self, event: &InboundEvent) -> Result<()> {
        let invoices = self.lifecycle.list_open().await?;
        self.remove_command(event).await;

        let now = Utc::now();
        if invoices.is_empty() {
            return self
                .chat
                .send_text(event.chat_id, render::empty_list_placeholder(now.second()))
                .await;
        }
        let text = render::open_list(&invoices, &self.clock.format_local(now));
        self.chat.send_html(event.chat_id, &text).await
    }

    async fn handle_add(&self, event: &InboundEvent, arg: &str) -> Result<()> {
        let Some(photo) = event.reply_to.as_ref().filter(|r| r.has_photo) else {
            return self
                .chat
                .reply(event.chat_id, event.message_id, render::ADD_NEEDS_PHOTO)
                .await;
        };

        let client_name = photo
            .caption
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .or_else(|| Some(arg.trim()).filter(|a| !a.is_empty()));
        let Some(client_name) = client_name else {
            return self
                .chat
                .reply(event.chat_id, event.message_id, render::ADD_NEEDS_CLIENT_NAME)
                .await;
        };

        let outcome = self
            .lifecycle
            .add_invoice(
                photo.chat_id,
                photo.message_id,
                client_name,
                event.sender.contributor(),
            )
            .await?;
        if let AddOutcome::AlreadyOpen(existing) = &outcome {
            debug!(message_id = existing.message_id, "Add ignored, invoice already open");
        }
        self.remove_command(event).await;
        Ok(())
    }

    async fn handle_report(&self, event: &InboundEvent) -> Result<()> {
        if !self.access.is_privileged(event.sender.user_id) {
            info!(user_id = event.sender.user_id, "Report requested by unprivileged user");
            self.remove_command(event).await;
            return Ok(());
        }

        let report = self.reports.daily_report(self.clock.today_start()).await?;
        self.remove_command(event).await;
        let text = render::daily_report(&report, &self.clock.format_local(Utc::now()));
        self.chat.send_html(event.chat_id, &text).await
    }

    async fn handle_delete(&self, event: &InboundEvent, target: DeleteTarget) -> Result<()> {
        let result = match target {
            DeleteTarget::Reply(message_id) => self.lifecycle.delete_invoice(message_id).await,
            DeleteTarget::Position(position) => self.lifecycle.delete_at_position(position).await,
            DeleteTarget::Invalid => {
                debug!(message_id = event.message_id, "Delete without reply or number");
                Ok(None)
            }
        };
        // The command is removed whether or not anything was deleted.
        self.remove_command(event).await;
        result?;
        Ok(())
    }

    async fn handle_help(&self, event: &InboundEvent) -> Result<()> {
        let text = render::help_text(&self.resolve_markers);
        self.chat.reply(event.chat_id, event.message_id, &text).await?;
        self.remove_command(event).await;
        Ok(())
    }

    async fn handle_auto_add(&self, event: &InboundEvent, client_name: &str) -> Result<()> {
        self.lifecycle
            .add_invoice(
                event.chat_id,
                event.message_id,
                client_name,
                event.sender.contributor(),
            )
            .await?;
        Ok(())
    }

    async fn remove_command(&self, event: &InboundEvent) {
        if let Err(e) = self.chat.delete_message(event.chat_id, event.message_id).await {
            debug!(message_id = event.message_id, error = %e, "Could not remove command message");
        }
    }
}
