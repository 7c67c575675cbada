//! Business logic services
//!
//! Every service borrows the shared `ServiceContext`. Member records are
//! only mutated while holding their `MemberLocks` guard.

pub mod context;
pub mod error;
pub mod experience;
pub mod locks;
pub mod maintenance;
pub mod moderation;
pub mod profile;
pub mod quest;
pub mod sticker_window;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use experience::ExperienceService;
pub use locks::{MemberGuard, MemberLocks};
pub use maintenance::MaintenanceService;
pub use moderation::ModerationService;
pub use profile::ProfileService;
pub use quest::QuestService;
pub use sticker_window::StickerRateTracker;
