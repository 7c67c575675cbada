//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use std::env;
use std::path::PathBuf;

use rankbot_core::UserId;
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    /// Health endpoint; disabled when `HEALTH_PORT` is unset
    pub health: Option<ServerConfig>,
    /// Optional TOML/JSON file overriding the built-in rule tables
    pub rules_file: Option<PathBuf>,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
    /// Recipient of `/helpadmin` notices
    pub developer_id: Option<UserId>,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Chat platform connection
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    /// Base URL of the Bot API, without the `/bot<token>` suffix
    pub api_url: String,
    /// Long-poll timeout passed to `getUpdates`
    pub poll_timeout_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Listen address
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Default value functions
fn default_app_name() -> String {
    "rankbot".to_string()
}

fn default_database_url() -> String {
    "sqlite://data/rankbot.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value does not parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("BOT_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingVar("BOT_TOKEN"))?;

        let env = match lookup("APP_ENV") {
            Some(value) => Environment::parse(&value)
                .ok_or(ConfigError::InvalidValue("APP_ENV", value))?,
            None => Environment::default(),
        };

        let health = match lookup("HEALTH_PORT") {
            Some(_) => Some(ServerConfig {
                host: lookup("HEALTH_HOST").unwrap_or_else(default_host),
                port: parse_var(&lookup, "HEALTH_PORT")?.unwrap_or_default(),
            }),
            None => None,
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
                developer_id: parse_var::<i64, _>(&lookup, "DEVELOPER_ID")?.map(UserId::new),
            },
            bot: BotConfig {
                token,
                api_url: lookup("TELEGRAM_API_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_api_url),
                poll_timeout_secs: parse_var(&lookup, "POLL_TIMEOUT_SECS")?
                    .unwrap_or_else(default_poll_timeout),
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or_else(default_database_url),
                max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
            },
            health,
            rules_file: lookup("RULES_FILE")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

/// Parse an optional variable, failing on values that are present but malformed
fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw.clone()))
        })
        .transpose()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Failed to load rules: {0}")]
    Rules(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_environment_is_development() {
        assert!(Environment::Development.is_development());
        assert!(!Environment::Production.is_development());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_token_is_required() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("BOT_TOKEN")));

        let err = AppConfig::from_lookup(lookup(&[("BOT_TOKEN", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("BOT_TOKEN")));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("BOT_TOKEN", "123:abc")])).unwrap();
        assert_eq!(config.app.name, "rankbot");
        assert_eq!(config.app.env, Environment::Development);
        assert!(config.app.developer_id.is_none());
        assert_eq!(config.bot.api_url, "https://api.telegram.org");
        assert_eq!(config.bot.poll_timeout_secs, 30);
        assert_eq!(config.database.url, "sqlite://data/rankbot.db");
        assert_eq!(config.database.max_connections, 5);
        assert!(config.health.is_none());
        assert!(config.rules_file.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("BOT_TOKEN", "123:abc"),
            ("APP_ENV", "Production"),
            ("DEVELOPER_ID", "42"),
            ("TELEGRAM_API_URL", "http://localhost:8081/"),
            ("HEALTH_PORT", "9000"),
            ("RULES_FILE", "rules.toml"),
        ]))
        .unwrap();

        assert!(config.app.env.is_production());
        assert_eq!(config.app.developer_id, Some(UserId::new(42)));
        assert_eq!(config.bot.api_url, "http://localhost:8081");
        let health = config.health.unwrap();
        assert_eq!(health.address(), "127.0.0.1:9000");
        assert_eq!(config.rules_file, Some(PathBuf::from("rules.toml")));
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("BOT_TOKEN", "t"), ("HEALTH_PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("HEALTH_PORT", _)));

        let err = AppConfig::from_lookup(lookup(&[("BOT_TOKEN", "t"), ("APP_ENV", "qa")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("APP_ENV", _)));
    }
}
