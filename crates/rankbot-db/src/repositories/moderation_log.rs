//! SQLite implementation of ModerationLogRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use rankbot_core::entities::{ModerationAction, ModerationLogEntry, NewModerationLog};
use rankbot_core::traits::{ModerationLogRepository, RepoResult};
use rankbot_core::value_objects::UserId;

use crate::mappers::small_from_column;
use crate::models::ModerationLogModel;

use super::error::map_db_error;

/// SQLite implementation of ModerationLogRepository
#[derive(Clone)]
pub struct SqliteModerationLogRepository {
    pool: SqlitePool,
}

impl SqliteModerationLogRepository {
    /// Create a new SqliteModerationLogRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModerationLogRepository for SqliteModerationLogRepository {
    #[instrument(skip(self, entry), fields(action = %entry.action, target = %entry.target_id))]
    async fn append(&self, entry: NewModerationLog) -> RepoResult<ModerationLogEntry> {
        let id = sqlx::query(
            r"
            INSERT INTO moderation_logs (action, moderator_id, target_id, reason, created_at)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(entry.action.as_str())
        .bind(entry.moderator_id.into_inner())
        .bind(entry.target_id.into_inner())
        .bind(&entry.reason)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?
        .last_insert_rowid();

        Ok(entry.into_entry(id))
    }

    #[instrument(skip(self))]
    async fn find_by_target(&self, target: UserId, limit: u32) -> RepoResult<Vec<ModerationLogEntry>> {
        let limit = i64::from(limit.clamp(1, 100));

        let results = sqlx::query_as::<_, ModerationLogModel>(
            r"
            SELECT id, action, moderator_id, target_id, reason, created_at
            FROM moderation_logs
            WHERE target_id = ?
            ORDER BY id DESC
            LIMIT ?
            ",
        )
        .bind(target.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(ModerationLogEntry::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn count_by_moderator_since(
        &self,
        moderator: UserId,
        action: ModerationAction,
        since: DateTime<Utc>,
    ) -> RepoResult<u32> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM moderation_logs
            WHERE moderator_id = ? AND action = ? AND created_at >= ?
            ",
        )
        .bind(moderator.into_inner())
        .bind(action.as_str())
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(small_from_column(count))
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM moderation_logs")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
