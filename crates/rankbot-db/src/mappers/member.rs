//! Member entity <-> model mapper

use std::collections::BTreeMap;

use rankbot_core::entities::{Member, ModerationState, ReactionStats};
use rankbot_core::value_objects::UserId;

use super::{from_column, small_from_column, to_column};
use crate::models::{MemberModel, ReactionModel};

/// Assemble a member from its row, reaction rows and completed quest IDs
pub fn member_from_parts(model: MemberModel, reactions: Vec<ReactionModel>, quests: Vec<String>) -> Member {
    let reactions: BTreeMap<String, ReactionStats> = reactions
        .into_iter()
        .map(|r| {
            (
                r.kind,
                ReactionStats {
                    given: from_column(r.given),
                    received: from_column(r.received),
                    given_today: small_from_column(r.given_today),
                    last_given_at: r.last_given_at,
                },
            )
        })
        .collect();

    Member {
        id: UserId::new(model.user_id),
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        xp: from_column(model.xp),
        rank: u8::try_from(model.rank_level.max(1)).unwrap_or(u8::MAX),
        messages_count: from_column(model.messages_count),
        daily_messages: small_from_column(model.daily_messages),
        reactions,
        quests_completed: quests,
        moderation: ModerationState {
            warns: small_from_column(model.warns),
            mutes: small_from_column(model.mutes),
            bans: small_from_column(model.bans),
            last_warn_at: model.last_warn_at,
            muted_until: model.muted_until,
            banned_until: model.banned_until,
        },
        joined_at: model.joined_at,
        last_active_at: model.last_active_at,
    }
}

/// Member values for the members upsert
pub struct MemberRow {
    pub user_id: i64,
    pub xp: i64,
    pub rank_level: i64,
    pub messages_count: i64,
    pub daily_messages: i64,
    pub warns: i64,
    pub mutes: i64,
    pub bans: i64,
}

impl MemberRow {
    pub fn new(member: &Member) -> Self {
        Self {
            user_id: member.id.into_inner(),
            xp: to_column(member.xp),
            rank_level: i64::from(member.rank),
            messages_count: to_column(member.messages_count),
            daily_messages: i64::from(member.daily_messages),
            warns: i64::from(member.moderation.warns),
            mutes: i64::from(member.moderation.mutes),
            bans: i64::from(member.moderation.bans),
        }
    }
}

/// Counter values for one member_reactions upsert
pub struct ReactionRow {
    pub given: i64,
    pub received: i64,
    pub given_today: i64,
}

impl ReactionRow {
    pub fn new(stats: &ReactionStats) -> Self {
        Self {
            given: to_column(stats.given),
            received: to_column(stats.received),
            given_today: i64::from(stats.given_today),
        }
    }
}
