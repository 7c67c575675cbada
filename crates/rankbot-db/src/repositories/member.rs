//! SQLite implementation of MemberRepository

use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, instrument};

use rankbot_core::entities::Member;
use rankbot_core::error::DomainError;
use rankbot_core::traits::{MemberRepository, RepoResult};
use rankbot_core::value_objects::UserId;

use crate::mappers::{member_from_parts, MemberRow, ReactionRow};
use crate::models::{MemberModel, ReactionModel};

use super::error::map_db_error;

const MEMBER_COLUMNS: &str = "user_id, username, first_name, last_name, xp, rank_level, \
     messages_count, daily_messages, warns, mutes, bans, last_warn_at, muted_until, \
     banned_until, joined_at, last_active_at";

/// SQLite implementation of MemberRepository
#[derive(Clone)]
pub struct SqliteMemberRepository {
    pool: SqlitePool,
}

impl SqliteMemberRepository {
    /// Create a new SqliteMemberRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load reaction counters and completed quests, then assemble the entity
    async fn hydrate(&self, model: MemberModel) -> Result<Member, DomainError> {
        let reactions = sqlx::query_as::<_, ReactionModel>(
            r"
            SELECT user_id, kind, given, received, given_today, last_given_at
            FROM member_reactions
            WHERE user_id = ?
            ",
        )
        .bind(model.user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let quests = sqlx::query_scalar::<_, String>(
            r"
            SELECT quest_id FROM member_quests
            WHERE user_id = ?
            ORDER BY completed_at, rowid
            ",
        )
        .bind(model.user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(member_from_parts(model, reactions, quests))
    }

    async fn upsert_member(conn: &mut SqliteConnection, member: &Member) -> Result<(), sqlx::Error> {
        let row = MemberRow::new(member);

        sqlx::query(
            r"
            INSERT INTO members (
                user_id, username, first_name, last_name, xp, rank_level,
                messages_count, daily_messages, warns, mutes, bans,
                last_warn_at, muted_until, banned_until, joined_at, last_active_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                username = excluded.username,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                xp = excluded.xp,
                rank_level = excluded.rank_level,
                messages_count = excluded.messages_count,
                daily_messages = excluded.daily_messages,
                warns = excluded.warns,
                mutes = excluded.mutes,
                bans = excluded.bans,
                last_warn_at = excluded.last_warn_at,
                muted_until = excluded.muted_until,
                banned_until = excluded.banned_until,
                last_active_at = excluded.last_active_at
            ",
        )
        .bind(row.user_id)
        .bind(&member.username)
        .bind(&member.first_name)
        .bind(&member.last_name)
        .bind(row.xp)
        .bind(row.rank_level)
        .bind(row.messages_count)
        .bind(row.daily_messages)
        .bind(row.warns)
        .bind(row.mutes)
        .bind(row.bans)
        .bind(member.moderation.last_warn_at)
        .bind(member.moderation.muted_until)
        .bind(member.moderation.banned_until)
        .bind(member.joined_at)
        .bind(member.last_active_at)
        .execute(&mut *conn)
        .await?;

        for (kind, stats) in &member.reactions {
            let counters = ReactionRow::new(stats);
            sqlx::query(
                r"
                INSERT INTO member_reactions (user_id, kind, given, received, given_today, last_given_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(user_id, kind) DO UPDATE SET
                    given = excluded.given,
                    received = excluded.received,
                    given_today = excluded.given_today,
                    last_given_at = excluded.last_given_at
                ",
            )
            .bind(row.user_id)
            .bind(kind)
            .bind(counters.given)
            .bind(counters.received)
            .bind(counters.given_today)
            .bind(stats.last_given_at)
            .execute(&mut *conn)
            .await?;
        }

        // The completed set only grows; existing rows keep their original timestamp
        for quest_id in &member.quests_completed {
            sqlx::query(
                r"
                INSERT OR IGNORE INTO member_quests (user_id, quest_id, completed_at)
                VALUES (?, ?, ?)
                ",
            )
            .bind(row.user_id)
            .bind(quest_id)
            .bind(member.last_active_at)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<Member>> {
        let result = sqlx::query_as::<_, MemberModel>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE user_id = ?"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match result {
            Some(model) => Ok(Some(self.hydrate(model).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, member), fields(user_id = %member.id))]
    async fn save(&self, member: &Member) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        Self::upsert_member(&mut tx, member)
            .await
            .map_err(map_db_error)?;
        tx.commit().await.map_err(map_db_error)?;

        debug!(xp = member.xp, rank = member.rank, "Member saved");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn top_by_xp(&self, limit: u32) -> RepoResult<Vec<Member>> {
        let limit = i64::from(limit.clamp(1, 100));

        let results = sqlx::query_as::<_, MemberModel>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members ORDER BY xp DESC, user_id ASC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut members = Vec::with_capacity(results.len());
        for model in results {
            members.push(self.hydrate(model).await?);
        }

        Ok(members)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn reset_daily_counters(&self) -> RepoResult<u64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let members = sqlx::query("UPDATE members SET daily_messages = 0")
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        sqlx::query("UPDATE member_reactions SET given_today = 0")
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(members)
    }
}
