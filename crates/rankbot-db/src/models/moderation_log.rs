//! Moderation log database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for moderation_logs table
#[derive(Debug, Clone, FromRow)]
pub struct ModerationLogModel {
    pub id: i64,
    pub action: String,
    pub moderator_id: i64,
    pub target_id: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
