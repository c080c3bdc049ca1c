//! Chat access policy.
//!
//! Private chats are open to allow-listed users only. Group chats are open
//! when they are the designated group, or when no group is designated.

use std::collections::HashSet;

use invoice_core::BotConfig;

use crate::event::ChatKind;

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    /// Private chat with a user not on the allow-list; answer with a hint.
    DeniedPrivate,
    /// A group other than the designated one; the bot should leave it.
    ForeignChat,
}

/// Static allow-list plus designated group.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    privileged: HashSet<i64>,
    allowed_chat: Option<i64>,
}

impl AccessPolicy {
    pub fn new(privileged: impl IntoIterator<Item = i64>, allowed_chat: Option<i64>) -> Self {
        Self {
            privileged: privileged.into_iter().collect(),
            allowed_chat,
        }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(config.privileged_users.iter().copied(), config.allowed_chat_id)
    }

    pub fn is_privileged(&self, user_id: i64) -> bool {
        self.privileged.contains(&user_id)
    }

    pub fn check(&self, kind: ChatKind, chat_id: i64, user_id: i64) -> AccessDecision {
        match kind {
            ChatKind::Private if self.is_privileged(user_id) => AccessDecision::Allowed,
            ChatKind::Private => AccessDecision::DeniedPrivate,
            ChatKind::Group => match self.allowed_chat {
                Some(allowed) if allowed != chat_id => AccessDecision::ForeignChat,
                _ => AccessDecision::Allowed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUP: i64 = -1001509336046;

    #[test]
    fn test_private_chat_needs_allow_list() {
        let policy = AccessPolicy::new([7], Some(GROUP));
        assert_eq!(policy.check(ChatKind::Private, 7, 7), AccessDecision::Allowed);
        assert_eq!(policy.check(ChatKind::Private, 8, 8), AccessDecision::DeniedPrivate);
    }

    #[test]
    fn test_only_designated_group() {
        let policy = AccessPolicy::new([7], Some(GROUP));
        assert_eq!(policy.check(ChatKind::Group, GROUP, 8), AccessDecision::Allowed);
        assert_eq!(policy.check(ChatKind::Group, -100999, 7), AccessDecision::ForeignChat);
    }

    #[test]
    fn test_any_group_without_designation() {
        let policy = AccessPolicy::new([], None);
        assert_eq!(policy.check(ChatKind::Group, -100999, 8), AccessDecision::Allowed);
        assert!(!policy.is_privileged(8));
    }
}
