//! Bot state
//!
//! Shared dependencies of the update handlers.

use std::sync::Arc;

use rankbot_common::AppConfig;
use rankbot_core::GameRules;
use rankbot_service::ServiceContext;

use crate::telegram::{Message, OutgoingMessage, TelegramClient, TelegramResult};

/// Bot application state
#[derive(Clone)]
pub struct BotState {
    /// Service context with repositories and coordination state
    service_context: Arc<ServiceContext>,
    /// Bot API client
    client: Arc<TelegramClient>,
    /// Application configuration
    config: Arc<AppConfig>,
    /// The bot's own username, for `/cmd@bot` addressing
    username: Arc<str>,
}

impl BotState {
    pub fn new(
        service_context: Arc<ServiceContext>,
        client: Arc<TelegramClient>,
        config: AppConfig,
        username: &str,
    ) -> Self {
        Self {
            service_context,
            client,
            config: Arc::new(config),
            username: Arc::from(username),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn shared_context(&self) -> Arc<ServiceContext> {
        Arc::clone(&self.service_context)
    }

    pub fn rules(&self) -> &GameRules {
        self.service_context.rules()
    }

    pub fn client(&self) -> &TelegramClient {
        &self.client
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub async fn send(&self, message: OutgoingMessage) -> TelegramResult<Message> {
        self.client.send_message(&message).await
    }

    /// HTML reply to `message` in its chat
    pub async fn reply(&self, message: &Message, text: impl Into<String>) -> TelegramResult<Message> {
        self.send(OutgoingMessage::html(message.chat.chat_id(), text).reply_to(message.message_id))
            .await
    }
}

impl std::fmt::Debug for BotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotState")
            .field("service_context", &self.service_context)
            .field("username", &self.username)
            .field("config", &"AppConfig")
            .finish()
    }
}
