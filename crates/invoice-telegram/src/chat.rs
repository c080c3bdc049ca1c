//! Outbound chat actions.
//!
//! The dispatcher only talks to Telegram through [`ChatActions`], so tests
//! can substitute a recorder for the real [`TeloxideChat`].

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode, ReplyParameters};

use crate::error::Result;

/// Messaging operations the bot performs.
#[async_trait]
pub trait ChatActions: Send + Sync {
    /// Send plain text.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Send HTML-formatted text.
    async fn send_html(&self, chat_id: i64, html: &str) -> Result<()>;

    /// Reply to a message with plain text.
    async fn reply(&self, chat_id: i64, message_id: i32, text: &str) -> Result<()>;

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<()>;

    async fn leave_chat(&self, chat_id: i64) -> Result<()>;
}

/// [`ChatActions`] backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TeloxideChat {
    bot: Bot,
}

impl TeloxideChat {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatActions for TeloxideChat {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot.send_message(ChatId(chat_id), text).await?;
        Ok(())
    }

    async fn send_html(&self, chat_id: i64, html: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), html)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn reply(&self, chat_id: i64, message_id: i32, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .reply_parameters(ReplyParameters::new(MessageId(message_id)))
            .await?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<()> {
        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id))
            .await?;
        Ok(())
    }

    async fn leave_chat(&self, chat_id: i64) -> Result<()> {
        self.bot.leave_chat(ChatId(chat_id)).await?;
        Ok(())
    }
}
