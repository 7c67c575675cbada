//! # rankbot-core
//!
//! Domain layer containing member records, rule tables (ranks, reactions,
//! moderation, quests), the rank engine, and the ports implemented by the
//! storage and chat-platform layers.
//! This crate has zero dependencies on infrastructure (database, HTTP, etc.).

pub mod entities;
pub mod error;
pub mod rules;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Member, ModerationAction, ModerationLogEntry, ModerationState, NewModerationLog, ReactionStats,
};
pub use error::DomainError;
pub use rules::{
    ExperiencePolicy, GameRules, ModerationPolicy, MuteTier, QuestBracket, QuestCatalog,
    QuestDefinition, QuestRequirement, RankChange, RankProgress, RankTable, RankTier,
    ReactionRule, ReactionTable,
};
pub use traits::{
    next_local_midnight, start_of_local_day, ChatPlatform, Clock, ManualClock, MemberRepository,
    ModerationLogRepository, PlatformError, RepoResult, SystemClock,
};
pub use value_objects::{ChatId, IdParseError, UserId};
