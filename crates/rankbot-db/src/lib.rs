//! # rankbot-db
//!
//! Database layer implementing repository traits with SQLite via SQLx.
//!
//! ## Overview
//!
//! This crate provides SQLite implementations for the repository traits
//! defined in `rankbot-core`. It handles:
//!
//! - Connection pool management
//! - Schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rankbot_db::{connect, DatabaseConfig, SqliteMemberRepository};
//!
//! async fn example() -> Result<(), sqlx::Error> {
//!     let pool = connect(&DatabaseConfig::in_memory()).await?;
//!     let members = SqliteMemberRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use migrations::run_migrations;
pub use pool::{connect, create_pool, DatabaseConfig, SqlitePool};
pub use repositories::{SqliteMemberRepository, SqliteModerationLogRepository};
