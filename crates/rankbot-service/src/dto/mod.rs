//! Data transfer objects returned by the services
//!
//! This module provides:
//! - Outcome types for checked operations (allowed, denied with a reason, or failed)
//! - Read views combining member records with rule tables

pub mod outcomes;
pub mod views;

pub use outcomes::{
    MessageActivity, ModerationDenied, ModerationOutcome, ModerationReceipt, QuestOutcome,
    QuestRejected, ReactionDenied, ReactionOutcome, ReactionReceipt, StickerCheck,
};
pub use views::{CommunityStats, MemberIdentity, ModeratorStats, ProfileView, QuestBoard};
