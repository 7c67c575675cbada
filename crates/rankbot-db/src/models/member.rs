//! Member database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for members table
#[derive(Debug, Clone, FromRow)]
pub struct MemberModel {
    pub user_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub xp: i64,
    pub rank_level: i64,
    pub messages_count: i64,
    pub daily_messages: i64,
    pub warns: i64,
    pub mutes: i64,
    pub bans: i64,
    pub last_warn_at: Option<DateTime<Utc>>,
    pub muted_until: Option<DateTime<Utc>>,
    pub banned_until: Option<DateTime<Utc>>,
    pub joined_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

/// Database model for member_reactions table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub user_id: i64,
    pub kind: String,
    pub given: i64,
    pub received: i64,
    pub given_today: i64,
    pub last_given_at: Option<DateTime<Utc>>,
}
