//! # rankbot-common
//!
//! Shared utilities including configuration, rule loading, error handling, and telemetry.

pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    load_rules, parse_rules, AppConfig, AppSettings, BotConfig, ConfigError, DatabaseConfig,
    Environment, RulesFormat, ServerConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
