//! Chat platform port
//!
//! Restrictions are enforced by the chat platform, the bot only asks for
//! them. Failures come back as values so callers can report them without
//! aborting the surrounding operation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::value_objects::{ChatId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The platform understood the request and refused it
    #[error("Platform rejected the request: {0}")]
    Rejected(String),

    /// The request never got a usable answer
    #[error("Platform unreachable: {0}")]
    Transport(String),
}

#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Revoke send permissions until `until`
    async fn restrict_member(
        &self,
        chat: ChatId,
        user: UserId,
        until: DateTime<Utc>,
    ) -> Result<(), PlatformError>;

    /// Remove the member from the chat until `until`
    async fn ban_member(
        &self,
        chat: ChatId,
        user: UserId,
        until: DateTime<Utc>,
    ) -> Result<(), PlatformError>;

    /// Restore default permissions and lift any ban
    async fn lift_restrictions(&self, chat: ChatId, user: UserId) -> Result<(), PlatformError>;
}
