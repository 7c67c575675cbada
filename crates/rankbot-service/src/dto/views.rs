//! Read views

use rankbot_core::{Member, QuestDefinition, RankProgress, RankTier, UserId};
use serde::Serialize;

/// Display identity reported by the chat platform
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberIdentity {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl MemberIdentity {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// Member card with rank progress
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub member: Member,
    pub tier: RankTier,
    pub next_tier: Option<RankTier>,
    pub progress: RankProgress,
}

/// Quests a member can still complete, and the ones already done
#[derive(Debug, Clone, Serialize)]
pub struct QuestBoard {
    pub available: Vec<QuestDefinition>,
    pub completed: Vec<String>,
    pub reward_xp: u64,
}

/// Actions a moderator issued since local midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ModeratorStats {
    pub warns: u32,
    pub mutes: u32,
    pub bans: u32,
    /// Warns still allowed today (`None` when uncapped)
    pub warns_left: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommunityStats {
    pub members: i64,
    pub moderation_logs: i64,
}
