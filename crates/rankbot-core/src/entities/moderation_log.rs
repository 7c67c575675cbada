//! Moderation log entries - append-only audit trail

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::UserId;

/// Kind of moderation action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    Warn,
    Mute,
    Ban,
    Amnesty,
}

impl ModerationAction {
    /// Storage representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Mute => "mute",
            Self::Ban => "ban",
            Self::Amnesty => "amnesty",
        }
    }
}

impl std::fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModerationAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warn" => Ok(Self::Warn),
            "mute" => Ok(Self::Mute),
            "ban" => Ok(Self::Ban),
            "amnesty" => Ok(Self::Amnesty),
            _ => Err(DomainError::InvalidModerationAction(s.to_string())),
        }
    }
}

/// A stored moderation log entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModerationLogEntry {
    /// Sequential ID assigned by the store
    pub id: i64,
    pub action: ModerationAction,
    pub moderator_id: UserId,
    pub target_id: UserId,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Entry about to be appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewModerationLog {
    pub action: ModerationAction,
    pub moderator_id: UserId,
    pub target_id: UserId,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl NewModerationLog {
    pub fn new(
        action: ModerationAction,
        moderator_id: UserId,
        target_id: UserId,
        reason: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            action,
            moderator_id,
            target_id,
            reason: reason.into(),
            created_at,
        }
    }

    /// Attach the store-assigned ID
    pub fn into_entry(self, id: i64) -> ModerationLogEntry {
        ModerationLogEntry {
            id,
            action: self.action,
            moderator_id: self.moderator_id,
            target_id: self.target_id,
            reason: self.reason,
            created_at: self.created_at,
        }
    }
}
