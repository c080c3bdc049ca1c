//! Telegram bot wiring: store connection, polling dispatcher and the
//! midnight scheduler.

use std::sync::Arc;

use invoice_core::{run_daily, BotConfig, DailySchedule, ReportAggregator, ReportClock};
use invoice_store::{InvoiceStore, MongoInvoiceStore};
use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use tracing::{debug, info, warn};

use crate::chat::{ChatActions, TeloxideChat};
use crate::error::{BotError, Result};
use crate::event::InboundEvent;
use crate::handlers::InvoiceDispatcher;
use crate::rollover::DailyRollover;

/// The invoice tracking bot.
pub struct InvoiceBot {
    /// The teloxide bot instance.
    bot: Bot,
    config: BotConfig,
    store: Arc<dyn InvoiceStore>,
}

impl InvoiceBot {
    /// Connect to MongoDB and create the bot.
    pub async fn connect(config: BotConfig) -> Result<Self> {
        let store = MongoInvoiceStore::connect(
            &config.mongo_uri,
            &config.mongo_database,
            &config.mongo_collection,
        )
        .await?;
        info!(
            database = %config.mongo_database,
            collection = %config.mongo_collection,
            "Connected to invoice store"
        );
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Create the bot over an existing store.
    pub fn with_store(config: BotConfig, store: Arc<dyn InvoiceStore>) -> Self {
        let bot = Bot::new(&config.bot_token);
        Self { bot, config, store }
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| BotError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Run the bot with long polling until Ctrl+C.
    pub async fn run(&self) -> Result<()> {
        info!("Starting Telegram bot with polling...");

        // Updates queued while the bot was down are not replayed
        self.bot.delete_webhook().drop_pending_updates(true).await?;

        let username = self.get_me().await?;
        let chat: Arc<dyn ChatActions> = Arc::new(TeloxideChat::new(self.bot.clone()));
        let clock = ReportClock::new(self.config.timezone);

        let dispatcher = Arc::new(
            InvoiceDispatcher::from_config(&self.config, self.store.clone(), chat.clone())
                .with_bot_username(username.clone()),
        );

        let mut rollover = DailyRollover::new(
            ReportAggregator::new(self.store.clone()),
            clock,
            chat,
        );
        if self.config.daily_digest {
            rollover = rollover.with_digest(self.config.privileged_users.clone());
        }
        let schedule = Arc::new(DailySchedule::new(clock));
        tokio::spawn(run_daily(schedule, Arc::new(rollover)));

        let handler = Update::filter_message().endpoint(move |msg: Message| {
            let dispatcher = Arc::clone(&dispatcher);
            async move {
                match InboundEvent::from_message(&msg) {
                    Some(event) => dispatcher.handle(event).await,
                    None => debug!(chat_id = %msg.chat.id, "Message without sender ignored"),
                }
                respond(())
            }
        });

        info!(username = %username, "Bot is running");

        Dispatcher::builder(self.bot.clone(), handler)
            .default_handler(|upd| async move {
                debug!("Unhandled update: {:?}", upd.kind);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error from the update listener",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        warn!("Dispatcher stopped");
        Ok(())
    }
}
