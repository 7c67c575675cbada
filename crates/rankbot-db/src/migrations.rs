//! Schema migrations
//!
//! Each migration runs once, inside a transaction, and records its version
//! in `schema_version`.

use sqlx::SqlitePool;
use tracing::info;

const MIGRATIONS: &[(i64, &str, &str)] = &[(
    1,
    "initial schema",
    r"
    CREATE TABLE members (
        user_id         INTEGER PRIMARY KEY,
        username        TEXT    NOT NULL DEFAULT '',
        first_name      TEXT    NOT NULL DEFAULT '',
        last_name       TEXT    NOT NULL DEFAULT '',
        xp              INTEGER NOT NULL DEFAULT 0,
        rank_level      INTEGER NOT NULL DEFAULT 1,
        messages_count  INTEGER NOT NULL DEFAULT 0,
        daily_messages  INTEGER NOT NULL DEFAULT 0,
        warns           INTEGER NOT NULL DEFAULT 0,
        mutes           INTEGER NOT NULL DEFAULT 0,
        bans            INTEGER NOT NULL DEFAULT 0,
        last_warn_at    TEXT,
        muted_until     TEXT,
        banned_until    TEXT,
        joined_at       TEXT    NOT NULL,
        last_active_at  TEXT    NOT NULL
    );

    CREATE INDEX idx_members_xp ON members (xp DESC);

    CREATE TABLE member_reactions (
        user_id         INTEGER NOT NULL REFERENCES members(user_id) ON DELETE CASCADE,
        kind            TEXT    NOT NULL,
        given           INTEGER NOT NULL DEFAULT 0,
        received        INTEGER NOT NULL DEFAULT 0,
        given_today     INTEGER NOT NULL DEFAULT 0,
        last_given_at   TEXT,
        PRIMARY KEY (user_id, kind)
    );

    CREATE TABLE member_quests (
        user_id         INTEGER NOT NULL REFERENCES members(user_id) ON DELETE CASCADE,
        quest_id        TEXT    NOT NULL,
        completed_at    TEXT    NOT NULL,
        PRIMARY KEY (user_id, quest_id)
    );

    CREATE TABLE moderation_logs (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        action          TEXT    NOT NULL,
        moderator_id    INTEGER NOT NULL,
        target_id       INTEGER NOT NULL,
        reason          TEXT    NOT NULL DEFAULT '',
        created_at      TEXT    NOT NULL
    );

    CREATE INDEX idx_moderation_logs_target ON moderation_logs (target_id, id DESC);
    CREATE INDEX idx_moderation_logs_moderator ON moderation_logs (moderator_id, action, created_at);
    ",
)];

/// Apply pending migrations and return the resulting schema version
pub async fn run_migrations(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
        .execute(pool)
        .await?;

    let mut version: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version")
        .fetch_one(pool)
        .await?;

    for (target, name, sql) in MIGRATIONS {
        if *target <= version {
            continue;
        }

        info!(version = *target, migration = *name, "Running migration");
        let mut tx = pool.begin().await?;
        sqlx::raw_sql(*sql).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
            .bind(*target)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        version = *target;
    }

    Ok(version)
}
