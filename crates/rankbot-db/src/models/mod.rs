//! Database models
//!
//! Row structs mirroring the SQLite tables. Conversions to domain entities
//! live in `crate::mappers`.

mod member;
mod moderation_log;

pub use member::{MemberModel, ReactionModel};
pub use moderation_log::ModerationLogModel;
