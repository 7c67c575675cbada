//! Outcomes of checked operations
//!
//! Permission and rate-limit denials carry a human-readable reason through
//! `Display`. Platform failures are reported as `Failed`, never as errors.

use std::fmt;

use chrono::{DateTime, Utc};
use rankbot_core::{ModerationAction, RankChange, UserId};
use serde::Serialize;

// ============================================================================
// Reactions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ReactionDenied {
    SelfReaction,
    UnknownReaction { kind: String },
    RankTooLow { required: u8 },
    DailyLimitReached { limit: u32 },
    CoolingDown { remaining_secs: u64 },
}

impl fmt::Display for ReactionDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfReaction => write!(f, "You can't react to your own messages"),
            Self::UnknownReaction { kind } => write!(f, "Unknown reaction: {kind}"),
            Self::RankTooLow { required } => write!(f, "This reaction requires rank {required}"),
            Self::DailyLimitReached { limit } => {
                write!(f, "Daily limit reached ({limit} per day)")
            }
            Self::CoolingDown { remaining_secs } => {
                write!(f, "Wait {remaining_secs}s before using this reaction again")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactionReceipt {
    pub kind: String,
    pub emoji: String,
    pub target: UserId,
    /// XP the target received
    pub xp: u64,
    /// Target's XP after the award
    pub target_xp: u64,
    /// Actor's count of this kind today, this one included
    pub given_today: u32,
    pub daily_limit: u32,
    pub rank_change: Option<RankChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReactionOutcome {
    Given(ReactionReceipt),
    Denied(ReactionDenied),
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MessageActivity {
    pub xp: u64,
    pub messages_count: u64,
    pub rank_change: Option<RankChange>,
}

// ============================================================================
// Quests
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestRejected {
    /// The member's rank bracket does not include the quest
    Locked,
    AlreadyCompleted,
    NotMet,
}

impl fmt::Display for QuestRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => write!(f, "This quest is not available at your rank yet"),
            Self::AlreadyCompleted => write!(f, "Quest already completed"),
            Self::NotMet => write!(f, "Quest requirements are not met yet"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuestOutcome {
    Completed {
        quest_id: String,
        reward_xp: u64,
        rank_change: Option<RankChange>,
    },
    Rejected {
        reason: QuestRejected,
    },
}

// ============================================================================
// Moderation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ModerationDenied {
    RankTooLow { action: ModerationAction, required: u8 },
    DurationTooLong { max_secs: u64 },
    InvalidDuration,
    DailyWarnLimit { limit: u32 },
}

impl fmt::Display for ModerationDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RankTooLow { action, required } => {
                write!(f, "You need rank {required} to {action}")
            }
            Self::DurationTooLong { max_secs } => {
                write!(f, "Duration exceeds your limit of {max_secs} seconds")
            }
            Self::InvalidDuration => write!(f, "Duration must be at least 30 seconds"),
            Self::DailyWarnLimit { limit } => {
                write!(f, "You can issue at most {limit} warns per day")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModerationReceipt {
    pub log_id: i64,
    pub action: ModerationAction,
    pub moderator: UserId,
    pub target: UserId,
    pub reason: String,
    /// End of the restriction for mutes and bans
    pub until: Option<DateTime<Utc>>,
    /// Target's warn count after the action
    pub target_warns: u32,
    /// Ban triggered by this warn reaching the threshold
    pub auto_ban: Option<Box<ModerationOutcome>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModerationOutcome {
    Applied(ModerationReceipt),
    Denied(ModerationDenied),
    Failed { reason: String },
}

impl ModerationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn receipt(&self) -> Option<&ModerationReceipt> {
        match self {
            Self::Applied(receipt) => Some(receipt),
            _ => None,
        }
    }
}

/// Result of running a sticker through the spam window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StickerCheck {
    /// Stickers inside the window, this one included
    pub count: usize,
    pub spam: bool,
    /// Automatic warn issued when `spam` is set
    pub warn: Option<ModerationOutcome>,
}
