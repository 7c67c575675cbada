//! # rankbot-service
//!
//! Application layer containing the bot's use cases, their outcome types,
//! and the per-member locking that serializes record updates.

pub mod dto;
pub mod services;

pub use services::{
    ExperienceService, MaintenanceService, MemberLocks, ModerationService, ProfileService,
    QuestService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    StickerRateTracker,
};
