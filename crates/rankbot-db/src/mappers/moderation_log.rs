//! ModerationLogEntry entity <-> model mapper

use rankbot_core::entities::{ModerationAction, ModerationLogEntry};
use rankbot_core::error::DomainError;
use rankbot_core::value_objects::UserId;

use crate::models::ModerationLogModel;

impl TryFrom<ModerationLogModel> for ModerationLogEntry {
    type Error = DomainError;

    fn try_from(model: ModerationLogModel) -> Result<Self, Self::Error> {
        Ok(ModerationLogEntry {
            id: model.id,
            action: model.action.parse::<ModerationAction>()?,
            moderator_id: UserId::new(model.moderator_id),
            target_id: UserId::new(model.target_id),
            reason: model.reason,
            created_at: model.created_at,
        })
    }
}
