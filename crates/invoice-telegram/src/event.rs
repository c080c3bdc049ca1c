//! Inbound chat events.
//!
//! Telegram messages are converted once, at the boundary, into an
//! [`InboundEvent`] with the handful of fields the bot acts on. Everything
//! after this point works on the plain struct, which keeps the dispatch
//! logic testable without the Telegram API.

use invoice_models::Contributor;
use teloxide::types::Message;

/// Where a message was posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    /// One-to-one conversation with the bot.
    Private,
    /// Group, supergroup or channel.
    Group,
}

/// Author of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub user_id: i64,
    pub full_name: String,
}

impl Sender {
    pub fn new(user_id: i64, full_name: impl Into<String>) -> Self {
        Self {
            user_id,
            full_name: full_name.into(),
        }
    }

    pub fn contributor(&self) -> Contributor {
        Contributor::new(self.user_id, self.full_name.clone())
    }
}

/// The message an inbound message replies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepliedMessage {
    pub chat_id: i64,
    pub message_id: i32,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub has_photo: bool,
}

impl RepliedMessage {
    pub fn new(chat_id: i64, message_id: i32) -> Self {
        Self {
            chat_id,
            message_id,
            text: None,
            caption: None,
            has_photo: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_photo(mut self, caption: Option<&str>) -> Self {
        self.has_photo = true;
        self.caption = caption.map(String::from);
        self
    }

    fn from_message(msg: &Message) -> Self {
        Self {
            chat_id: msg.chat.id.0,
            message_id: msg.id.0,
            text: msg.text().map(String::from),
            caption: msg.caption().map(String::from),
            has_photo: msg.photo().is_some(),
        }
    }
}

/// A message as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub chat_id: i64,
    pub chat_kind: ChatKind,
    pub message_id: i32,
    pub sender: Sender,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub has_photo: bool,
    pub reply_to: Option<RepliedMessage>,
}

impl InboundEvent {
    pub fn new(chat_id: i64, chat_kind: ChatKind, message_id: i32, sender: Sender) -> Self {
        Self {
            chat_id,
            chat_kind,
            message_id,
            sender,
            text: None,
            caption: None,
            has_photo: false,
            reply_to: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_photo(mut self, caption: Option<&str>) -> Self {
        self.has_photo = true;
        self.caption = caption.map(String::from);
        self
    }

    pub fn replying_to(mut self, replied: RepliedMessage) -> Self {
        self.reply_to = Some(replied);
        self
    }

    /// Convert a Telegram message. Returns `None` for messages without a
    /// user author, such as channel posts.
    pub fn from_message(msg: &Message) -> Option<Self> {
        let user = msg.from.as_ref()?;
        let chat_kind = if msg.chat.is_private() {
            ChatKind::Private
        } else {
            ChatKind::Group
        };

        Some(Self {
            chat_id: msg.chat.id.0,
            chat_kind,
            message_id: msg.id.0,
            sender: Sender::new(user.id.0 as i64, user.full_name()),
            text: msg.text().map(String::from),
            caption: msg.caption().map(String::from),
            has_photo: msg.photo().is_some(),
            reply_to: msg.reply_to_message().map(RepliedMessage::from_message),
        })
    }

    /// Text a command may be read from: the message text, else the caption.
    pub fn command_source(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }
}
