//! Test fixtures
//!
//! Member identities and a chat platform fake.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rankbot_core::{ChatId, ChatPlatform, PlatformError, UserId};
use rankbot_service::dto::MemberIdentity;

/// Group chat every scenario runs in
pub const CHAT: ChatId = ChatId::new(-100_500);

/// The bot's own account
pub const BOT: UserId = UserId::new(1);

/// Counter for unique member IDs
static NEXT_ID: AtomicI64 = AtomicI64::new(1_000);

/// Get a member ID no other fixture has handed out
pub fn unique_user_id() -> UserId {
    UserId::new(NEXT_ID.fetch_add(1, Ordering::SeqCst))
}

/// Identity with a unique ID and a readable name
pub fn identity(first_name: &str) -> MemberIdentity {
    MemberIdentity {
        id: unique_user_id(),
        username: first_name.to_lowercase(),
        first_name: first_name.to_string(),
        last_name: String::new(),
    }
}

/// A platform call as seen by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Restrict { user: UserId, until: DateTime<Utc> },
    Ban { user: UserId, until: DateTime<Utc> },
    Lift { user: UserId },
}

/// Chat platform that records every call and can refuse them
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    calls: Mutex<Vec<PlatformCall>>,
    refusal: Mutex<Option<String>>,
}

impl RecordingPlatform {
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn bans(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, PlatformCall::Ban { .. }))
            .count()
    }

    /// Make every following call fail with `description`
    pub fn refuse(&self, description: &str) {
        *self.refusal.lock().unwrap_or_else(PoisonError::into_inner) = Some(description.to_string());
    }

    fn record(&self, call: PlatformCall) -> Result<(), PlatformError> {
        if let Some(description) = self.refusal.lock().unwrap_or_else(PoisonError::into_inner).clone() {
            return Err(PlatformError::Rejected(description));
        }
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
        Ok(())
    }
}

#[async_trait]
impl ChatPlatform for RecordingPlatform {
    async fn restrict_member(&self, _chat: ChatId, user: UserId, until: DateTime<Utc>) -> Result<(), PlatformError> {
        self.record(PlatformCall::Restrict { user, until })
    }

    async fn ban_member(&self, _chat: ChatId, user: UserId, until: DateTime<Utc>) -> Result<(), PlatformError> {
        self.record(PlatformCall::Ban { user, until })
    }

    async fn lift_restrictions(&self, _chat: ChatId, user: UserId) -> Result<(), PlatformError> {
        self.record(PlatformCall::Lift { user })
    }
}
