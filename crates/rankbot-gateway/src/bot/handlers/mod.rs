//! Update handlers
//!
//! Messages go through `message::handle`, button presses through
//! `callback::handle`. Moderation requests from either path share
//! `moderate`.

pub mod callback;
pub mod command;
pub mod message;

use rankbot_core::ChatId;
use rankbot_service::dto::ModerationOutcome;
use rankbot_service::{ModerationService, ProfileService};
use tracing::{info, warn};

use super::error::HandlerResult;
use super::state::BotState;
use crate::render::cards;
use crate::telegram::{Chat, OutgoingMessage, User};

/// Shown for failures that are not the user's fault
pub(crate) const GENERIC_FAILURE: &str = "⚠️ Something went wrong, please try again later";

/// Reason recorded when the moderator gives none
const NO_REASON: &str = "No reason given";

/// A moderation action on a replied-to member
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationRequest {
    Warn { reason: String },
    Mute { duration_secs: u64, reason: String },
    Ban { duration_secs: u64, reason: String },
    Amnesty,
}

fn reason_or_default(reason: &str) -> &str {
    if reason.trim().is_empty() {
        NO_REASON
    } else {
        reason.trim()
    }
}

/// Run a moderation request and render the outcome for the chat
pub async fn moderate(
    state: &BotState,
    request: &ModerationRequest,
    moderator: &User,
    target: &User,
    chat: ChatId,
) -> HandlerResult<String> {
    if target.is_bot {
        return Ok("🤖 Bots are out of reach of moderation".to_string());
    }

    let ctx = state.service_context();
    let target_member = ProfileService::new(ctx).touch(&target.identity()).await?;
    let service = ModerationService::new(ctx);
    let (moderator_id, target_id) = (moderator.user_id(), target.user_id());

    let outcome = match request {
        ModerationRequest::Warn { reason } => {
            service
                .warn(moderator_id, target_id, chat, reason_or_default(reason))
                .await?
        }
        ModerationRequest::Mute { duration_secs, reason } => {
            service
                .mute(moderator_id, target_id, chat, *duration_secs, reason_or_default(reason))
                .await?
        }
        ModerationRequest::Ban { duration_secs, reason } => {
            service
                .ban(moderator_id, target_id, chat, *duration_secs, reason_or_default(reason))
                .await?
        }
        ModerationRequest::Amnesty => service.amnesty(moderator_id, target_id, chat).await?,
    };

    match &outcome {
        ModerationOutcome::Applied(receipt) => {
            info!(action = %receipt.action, moderator = %moderator_id, target = %target_id, "Moderation applied");
        }
        ModerationOutcome::Denied(reason) => {
            info!(moderator = %moderator_id, reason = %reason, "Moderation denied");
        }
        ModerationOutcome::Failed { reason } => {
            warn!(moderator = %moderator_id, reason = %reason, "Moderation failed on the platform");
        }
    }

    Ok(cards::moderation_result(&outcome, &target_member.display_name()))
}

/// Forward a help request to the configured developer.
///
/// Returns the text to show the requester.
pub async fn notify_admin(
    state: &BotState,
    from: &User,
    chat: &Chat,
    text: &str,
) -> HandlerResult<&'static str> {
    let Some(developer) = state.config().app.developer_id else {
        return Ok("No admin contact is configured");
    };

    state
        .send(OutgoingMessage::html(developer.into(), cards::admin_notice(from, chat, text)))
        .await?;
    info!(from = from.id, chat = chat.id, "Admin notified");
    Ok("✅ The admin has been notified")
}
