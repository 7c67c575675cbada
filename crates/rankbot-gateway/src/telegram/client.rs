//! Telegram Bot API client
//!
//! Thin JSON-over-HTTPS wrapper. Every method maps to one Bot API call.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rankbot_common::BotConfig;
use rankbot_core::{ChatId, UserId};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::error::{TelegramError, TelegramResult};
use super::types::{ApiResponse, ChatPermissions, Message, OutgoingMessage, Update, User};

/// Headroom over the long-poll timeout before the HTTP request gives up
const REQUEST_GRACE_SECS: u64 = 10;

pub struct TelegramClient {
    http: Client,
    /// `{api_url}/bot{token}`; never logged
    endpoint: String,
    poll_timeout_secs: u64,
}

impl TelegramClient {
    /// Create a client for the configured bot
    ///
    /// # Errors
    /// Returns `TelegramError::Http` if the HTTP client cannot be built
    pub fn new(config: &BotConfig) -> TelegramResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs + REQUEST_GRACE_SECS))
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/bot{}", config.api_url.trim_end_matches('/'), config.token),
            poll_timeout_secs: config.poll_timeout_secs,
        })
    }

    async fn call<P, R>(&self, method: &'static str, params: &P) -> TelegramResult<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response: ApiResponse<R> = self
            .http
            .post(format!("{}/{method}", self.endpoint))
            .json(params)
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            return Err(TelegramError::Api {
                code: response.error_code.unwrap_or_default(),
                description: response.description.unwrap_or_default(),
            });
        }

        response.result.ok_or(TelegramError::EmptyResult(method))
    }

    /// The bot's own account
    #[instrument(skip(self))]
    pub async fn get_me(&self) -> TelegramResult<User> {
        self.call("getMe", &json!({})).await
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(&self, offset: Option<i64>) -> TelegramResult<Vec<Update>> {
        let updates: Vec<Update> = self
            .call(
                "getUpdates",
                &json!({
                    "offset": offset,
                    "timeout": self.poll_timeout_secs,
                    "allowed_updates": ["message", "callback_query"],
                }),
            )
            .await?;

        if !updates.is_empty() {
            debug!(count = updates.len(), "Updates received");
        }
        Ok(updates)
    }

    #[instrument(skip(self, message), fields(chat_id = message.chat_id))]
    pub async fn send_message(&self, message: &OutgoingMessage) -> TelegramResult<Message> {
        self.call("sendMessage", message).await
    }

    /// Stop the client's spinner, optionally with a toast or an alert
    #[instrument(skip(self, text))]
    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> TelegramResult<()> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &json!({
                    "callback_query_id": callback_query_id,
                    "text": text,
                    "show_alert": show_alert,
                }),
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn restrict_chat_member(
        &self,
        chat: ChatId,
        user: UserId,
        permissions: ChatPermissions,
        until: Option<DateTime<Utc>>,
    ) -> TelegramResult<()> {
        let _: bool = self
            .call(
                "restrictChatMember",
                &json!({
                    "chat_id": chat.into_inner(),
                    "user_id": user.into_inner(),
                    "permissions": permissions,
                    "until_date": until.map(|t| t.timestamp()),
                }),
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn ban_chat_member(&self, chat: ChatId, user: UserId, until: DateTime<Utc>) -> TelegramResult<()> {
        let _: bool = self
            .call(
                "banChatMember",
                &json!({
                    "chat_id": chat.into_inner(),
                    "user_id": user.into_inner(),
                    "until_date": until.timestamp(),
                }),
            )
            .await?;
        Ok(())
    }

    /// Unban without kicking members who are not banned
    #[instrument(skip(self))]
    pub async fn unban_chat_member(&self, chat: ChatId, user: UserId) -> TelegramResult<()> {
        let _: bool = self
            .call(
                "unbanChatMember",
                &json!({
                    "chat_id": chat.into_inner(),
                    "user_id": user.into_inner(),
                    "only_if_banned": true,
                }),
            )
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("endpoint", &"<redacted>")
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}
