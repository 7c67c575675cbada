//! Service context - dependency container for services
//!
//! Holds the repositories, the chat platform, the clock, the rule tables and
//! the in-process coordination state shared by every service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rankbot_core::traits::{ChatPlatform, Clock, MemberRepository, ModerationLogRepository, SystemClock};
use rankbot_core::{GameRules, Member, UserId};

use super::error::{ServiceError, ServiceResult};
use super::locks::MemberLocks;
use super::sticker_window::StickerRateTracker;

/// Service context containing all dependencies
///
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    member_repo: Arc<dyn MemberRepository>,
    moderation_log_repo: Arc<dyn ModerationLogRepository>,

    // Collaborators
    platform: Arc<dyn ChatPlatform>,
    clock: Arc<dyn Clock>,
    rules: Arc<GameRules>,

    /// The bot's own user ID; system-issued actions are attributed to it
    bot_id: UserId,

    // Coordination
    locks: MemberLocks,
    stickers: StickerRateTracker,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        member_repo: Arc<dyn MemberRepository>,
        moderation_log_repo: Arc<dyn ModerationLogRepository>,
        platform: Arc<dyn ChatPlatform>,
        clock: Arc<dyn Clock>,
        rules: Arc<GameRules>,
        bot_id: UserId,
    ) -> Self {
        let stickers = StickerRateTracker::new(rules.moderation.sticker_window_secs);
        Self {
            member_repo,
            moderation_log_repo,
            platform,
            clock,
            rules,
            bot_id,
            locks: MemberLocks::new(),
            stickers,
        }
    }

    // === Repositories ===

    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    pub fn moderation_log_repo(&self) -> &dyn ModerationLogRepository {
        self.moderation_log_repo.as_ref()
    }

    // === Collaborators ===

    pub fn platform(&self) -> &dyn ChatPlatform {
        self.platform.as_ref()
    }

    pub fn rules(&self) -> &GameRules {
        self.rules.as_ref()
    }

    pub fn bot_id(&self) -> UserId {
        self.bot_id
    }

    /// Current time from the configured clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // === Coordination ===

    pub fn locks(&self) -> &MemberLocks {
        &self.locks
    }

    pub fn stickers(&self) -> &StickerRateTracker {
        &self.stickers
    }

    /// Load a member, synthesizing a fresh record for unknown IDs.
    ///
    /// The fresh record is not persisted here; callers save it after mutating.
    pub async fn member_or_new(&self, id: UserId) -> ServiceResult<Member> {
        Ok(self
            .member_repo
            .find_by_id(id)
            .await?
            .unwrap_or_else(|| Member::new(id, self.now())))
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("bot_id", &self.bot_id)
            .field("locks", &self.locks)
            .field("stickers", &self.stickers)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    member_repo: Option<Arc<dyn MemberRepository>>,
    moderation_log_repo: Option<Arc<dyn ModerationLogRepository>>,
    platform: Option<Arc<dyn ChatPlatform>>,
    clock: Option<Arc<dyn Clock>>,
    rules: Option<Arc<GameRules>>,
    bot_id: Option<UserId>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            member_repo: None,
            moderation_log_repo: None,
            platform: None,
            clock: None,
            rules: None,
            bot_id: None,
        }
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn moderation_log_repo(mut self, repo: Arc<dyn ModerationLogRepository>) -> Self {
        self.moderation_log_repo = Some(repo);
        self
    }

    pub fn platform(mut self, platform: Arc<dyn ChatPlatform>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Defaults to the system clock
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Defaults to the built-in rule tables
    pub fn rules(mut self, rules: Arc<GameRules>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn bot_id(mut self, bot_id: UserId) -> Self {
        self.bot_id = Some(bot_id);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a required dependency is missing
    /// or the rule tables are inconsistent
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let rules = self.rules.unwrap_or_default();
        rules.validate()?;

        Ok(ServiceContext::new(
            self.member_repo
                .ok_or_else(|| ServiceError::validation("member_repo is required"))?,
            self.moderation_log_repo
                .ok_or_else(|| ServiceError::validation("moderation_log_repo is required"))?,
            self.platform
                .ok_or_else(|| ServiceError::validation("platform is required"))?,
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            rules,
            self.bot_id
                .ok_or_else(|| ServiceError::validation("bot_id is required"))?,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
