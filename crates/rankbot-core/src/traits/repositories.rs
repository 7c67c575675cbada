//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, the storage layer provides the
//! implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Member, ModerationAction, ModerationLogEntry, NewModerationLog};
use crate::error::DomainError;
use crate::value_objects::UserId;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find a member by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<Member>>;

    /// Insert or fully replace a member record, including reaction counters
    /// and completed quests
    async fn save(&self, member: &Member) -> RepoResult<()>;

    /// Members ordered by XP, highest first
    async fn top_by_xp(&self, limit: u32) -> RepoResult<Vec<Member>>;

    /// Number of known members
    async fn count(&self) -> RepoResult<i64>;

    /// Zero daily message and reaction counters of every member.
    /// Returns the number of members touched.
    async fn reset_daily_counters(&self) -> RepoResult<u64>;
}

// ============================================================================
// Moderation Log Repository
// ============================================================================

#[async_trait]
pub trait ModerationLogRepository: Send + Sync {
    /// Append an entry and return it with its assigned ID
    async fn append(&self, entry: NewModerationLog) -> RepoResult<ModerationLogEntry>;

    /// Most recent entries about a target, newest first
    async fn find_by_target(&self, target: UserId, limit: u32) -> RepoResult<Vec<ModerationLogEntry>>;

    /// Entries of one action issued by a moderator at or after `since`
    async fn count_by_moderator_since(
        &self,
        moderator: UserId,
        action: ModerationAction,
        since: DateTime<Utc>,
    ) -> RepoResult<u32>;

    /// Total number of entries
    async fn count(&self) -> RepoResult<i64>;
}
