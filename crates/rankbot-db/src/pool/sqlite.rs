//! SQLite connection pool management

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::migrations::run_migrations;

/// Database configuration for connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL (`sqlite://path/to.db` or `sqlite::memory:`)
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Maximum time to wait for a connection
    pub acquire_timeout: Duration,
    /// Maximum idle time before a connection is closed
    pub idle_timeout: Option<Duration>,
    /// Maximum lifetime of a connection
    pub max_lifetime: Option<Duration>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::from("sqlite://data/rankbot.db"),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Some(Duration::from_secs(300)),
            max_lifetime: Some(Duration::from_secs(1800)),
        }
    }
}

impl DatabaseConfig {
    /// Private in-memory database.
    ///
    /// Every SQLite memory connection is its own database, so the pool holds
    /// exactly one connection and never recycles it.
    pub fn in_memory() -> Self {
        Self {
            url: String::from("sqlite::memory:"),
            max_connections: 1,
            idle_timeout: None,
            max_lifetime: None,
            ..Default::default()
        }
    }

    pub fn is_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl From<&rankbot_common::DatabaseConfig> for DatabaseConfig {
    fn from(config: &rankbot_common::DatabaseConfig) -> Self {
        let base = Self {
            url: config.url.clone(),
            max_connections: config.max_connections.max(1),
            ..Default::default()
        };
        if base.is_memory() {
            Self {
                url: base.url,
                ..Self::in_memory()
            }
        } else {
            base
        }
    }
}

/// Create a new SQLite connection pool, creating the database file if needed
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let mut options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    if !config.is_memory() {
        options = options.journal_mode(SqliteJournalMode::Wal);
        if let Some(dir) = options.get_filename().parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }
    }

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect_with(options)
        .await
}

/// Create a pool and bring the schema up to date
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let pool = create_pool(config).await?;
    let version = run_migrations(&pool).await?;
    info!(url = %config.url, schema_version = version, "Database ready");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout, Duration::from_secs(10));
        assert!(!config.is_memory());
    }

    #[test]
    fn test_in_memory_config_keeps_single_connection() {
        let config = DatabaseConfig::in_memory();
        assert!(config.is_memory());
        assert_eq!(config.max_connections, 1);
        assert!(config.idle_timeout.is_none());
        assert!(config.max_lifetime.is_none());
    }

    #[test]
    fn test_from_app_config() {
        let app = rankbot_common::DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 8,
        };
        let config = DatabaseConfig::from(&app);
        assert_eq!(config.max_connections, 1);

        let app = rankbot_common::DatabaseConfig {
            url: "sqlite://bot.db".to_string(),
            max_connections: 8,
        };
        assert_eq!(DatabaseConfig::from(&app).max_connections, 8);
    }

    #[tokio::test]
    async fn test_connect_in_memory() {
        let pool = connect(&DatabaseConfig::in_memory()).await.unwrap();
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }
}
