//! `ChatPlatform` backed by the Bot API

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rankbot_core::{ChatId, ChatPlatform, PlatformError, UserId};

use super::client::TelegramClient;
use super::types::ChatPermissions;

#[async_trait]
impl ChatPlatform for TelegramClient {
    async fn restrict_member(&self, chat: ChatId, user: UserId, until: DateTime<Utc>) -> Result<(), PlatformError> {
        Ok(self
            .restrict_chat_member(chat, user, ChatPermissions::muted(), Some(until))
            .await?)
    }

    async fn ban_member(&self, chat: ChatId, user: UserId, until: DateTime<Utc>) -> Result<(), PlatformError> {
        Ok(self.ban_chat_member(chat, user, until).await?)
    }

    async fn lift_restrictions(&self, chat: ChatId, user: UserId) -> Result<(), PlatformError> {
        self.unban_chat_member(chat, user).await?;
        Ok(self
            .restrict_chat_member(chat, user, ChatPermissions::member(), None)
            .await?)
    }
}
