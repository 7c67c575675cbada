//! Domain entities - core business objects

mod member;
mod moderation_log;

pub use member::{Member, ModerationState, ReactionStats};
pub use moderation_log::{ModerationAction, ModerationLogEntry, NewModerationLog};
