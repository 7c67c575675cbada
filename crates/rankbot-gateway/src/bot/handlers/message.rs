//! Incoming message handling

use rankbot_service::{ExperienceService, ModerationService, ProfileService};
use tracing::{debug, info, instrument};

use super::command;
use crate::bot::error::HandlerResult;
use crate::bot::state::BotState;
use crate::commands::Command;
use crate::render::{cards, escape_html, keyboards};
use crate::telegram::{Message, OutgoingMessage, User};

/// Route a message to the join, sticker, command or activity path
#[instrument(skip(state, message), fields(chat = message.chat.id, message_id = message.message_id))]
pub async fn handle(state: &BotState, message: &Message) -> HandlerResult<()> {
    if !message.new_chat_members.is_empty() {
        return greet_new_members(state, message).await;
    }

    let Some(from) = message.from.as_ref().filter(|u| !u.is_bot) else {
        return Ok(());
    };

    if message.sticker.is_some() {
        if message.chat.is_private() {
            return Ok(());
        }
        return check_sticker(state, message, from).await;
    }

    let Some(text) = message.text.as_deref() else {
        return Ok(());
    };

    match Command::parse(text, state.username()) {
        Some(Ok(cmd)) => command::handle(state, message, from, cmd).await,
        Some(Err(e)) => {
            state.reply(message, escape_html(&e.to_string())).await?;
            Ok(())
        }
        None if text.starts_with('/') => Ok(()),
        None => record_activity(state, message, from).await,
    }
}

async fn greet_new_members(state: &BotState, message: &Message) -> HandlerResult<()> {
    let profiles = ProfileService::new(state.service_context());
    for user in message.new_chat_members.iter().filter(|u| !u.is_bot) {
        profiles.touch(&user.identity()).await?;
        state
            .send(
                OutgoingMessage::html(message.chat.chat_id(), cards::new_member(user))
                    .keyboard(keyboards::join_community()),
            )
            .await?;
        info!(user = user.id, "New member greeted");
    }
    Ok(())
}

async fn check_sticker(state: &BotState, message: &Message, from: &User) -> HandlerResult<()> {
    let check = ModerationService::new(state.service_context())
        .sticker_spam_check(from.user_id(), message.chat.chat_id())
        .await?;

    debug!(user = from.id, count = check.count, spam = check.spam, "Sticker counted");
    if let Some(outcome) = &check.warn {
        let text = format!(
            "🚫 Too many stickers!\n{}",
            cards::moderation_result(outcome, &from.display_name())
        );
        state.reply(message, text).await?;
    }
    Ok(())
}

async fn record_activity(state: &BotState, message: &Message, from: &User) -> HandlerResult<()> {
    let activity = ExperienceService::new(state.service_context())
        .record_message(&from.identity())
        .await?;

    let Some(change) = activity.rank_change else {
        return Ok(());
    };
    let Some(tier) = state.rules().ranks.tier(change.to) else {
        return Ok(());
    };

    let announcement = OutgoingMessage::html(message.chat.chat_id(), cards::rank_up(&from.display_name(), tier))
        .reply_to(message.message_id)
        .keyboard(keyboards::reactions(from.user_id(), &state.rules().reactions));
    state.send(announcement).await?;
    Ok(())
}
