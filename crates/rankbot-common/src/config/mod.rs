//! Configuration structs and rule loading

mod app_config;
mod rules;

pub use app_config::{
    AppConfig, AppSettings, BotConfig, ConfigError, DatabaseConfig, Environment, ServerConfig,
};
pub use rules::{load_rules, parse_rules, RulesFormat};
