//! Shared fixtures for service unit tests

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rankbot_core::traits::{ChatPlatform, ManualClock, MemberRepository, PlatformError};
use rankbot_core::{ChatId, GameRules, Member, UserId};
use rankbot_db::{connect, DatabaseConfig, SqliteMemberRepository, SqliteModerationLogRepository};

use super::context::{ServiceContext, ServiceContextBuilder};

pub const BOT: UserId = UserId::new(1);
pub const CHAT: ChatId = ChatId::new(-100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Restrict(UserId, DateTime<Utc>),
    Ban(UserId, DateTime<Utc>),
    Lift(UserId),
}

/// Platform fake that records calls and can be told to refuse them
#[derive(Default)]
pub struct RecordingPlatform {
    calls: Mutex<Vec<PlatformCall>>,
    failure: Mutex<Option<PlatformError>>,
}

impl RecordingPlatform {
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn fail_with(&self, error: PlatformError) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    fn record(&self, call: PlatformCall) -> Result<(), PlatformError> {
        if let Some(error) = self.failure.lock().unwrap_or_else(PoisonError::into_inner).clone() {
            return Err(error);
        }
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
        Ok(())
    }
}

#[async_trait]
impl ChatPlatform for RecordingPlatform {
    async fn restrict_member(&self, _chat: ChatId, user: UserId, until: DateTime<Utc>) -> Result<(), PlatformError> {
        self.record(PlatformCall::Restrict(user, until))
    }

    async fn ban_member(&self, _chat: ChatId, user: UserId, until: DateTime<Utc>) -> Result<(), PlatformError> {
        self.record(PlatformCall::Ban(user, until))
    }

    async fn lift_restrictions(&self, _chat: ChatId, user: UserId) -> Result<(), PlatformError> {
        self.record(PlatformCall::Lift(user))
    }
}

pub struct Harness {
    pub ctx: ServiceContext,
    pub clock: Arc<ManualClock>,
    pub platform: Arc<RecordingPlatform>,
    pub members: Arc<SqliteMemberRepository>,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_rules(GameRules::default()).await
    }

    pub async fn with_rules(rules: GameRules) -> Self {
        let pool = connect(&DatabaseConfig::in_memory()).await.unwrap();
        let members = Arc::new(SqliteMemberRepository::new(pool.clone()));
        let logs = Arc::new(SqliteModerationLogRepository::new(pool));
        // Midday keeps tests away from the local-midnight boundary
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap()));
        let platform = Arc::new(RecordingPlatform::default());

        let ctx = ServiceContextBuilder::new()
            .member_repo(members.clone())
            .moderation_log_repo(logs)
            .platform(platform.clone())
            .clock(clock.clone())
            .rules(Arc::new(rules))
            .bot_id(BOT)
            .build()
            .unwrap();

        Self {
            ctx,
            clock,
            platform,
            members,
        }
    }

    /// Store a member with the given XP and rank
    pub async fn seed(&self, id: i64, xp: u64, rank: u8) -> UserId {
        let id = UserId::new(id);
        let mut member = Member::new(id, self.ctx.now());
        member.xp = xp;
        member.rank = rank;
        self.members.save(&member).await.unwrap();
        id
    }

    pub async fn load(&self, id: UserId) -> Member {
        self.members.find_by_id(id).await.unwrap().unwrap()
    }
}
