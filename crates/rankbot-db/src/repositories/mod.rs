//! Repository implementations
//!
//! SQLite implementations of the repository traits defined in rankbot-core.

mod error;
mod member;
mod moderation_log;

pub use member::SqliteMemberRepository;
pub use moderation_log::SqliteModerationLogRepository;
