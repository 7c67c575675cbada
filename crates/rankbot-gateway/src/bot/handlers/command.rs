//! Slash command handlers

use rankbot_service::{ProfileService, QuestService};
use tracing::{info, instrument};

use super::{moderate, notify_admin, ModerationRequest};
use crate::bot::error::HandlerResult;
use crate::bot::state::BotState;
use crate::commands::Command;
use crate::render::{cards, keyboards};
use crate::telegram::{InlineKeyboardMarkup, Message, OutgoingMessage, User};

/// Size of the `/top` list
pub const TOP_LIMIT: u32 = 10;

const REPLY_HINT: &str = "↩️ Reply to the member's message with this command";

#[instrument(skip(state, message, from), fields(user = from.id))]
pub async fn handle(state: &BotState, message: &Message, from: &User, command: Command) -> HandlerResult<()> {
    let chat = message.chat.chat_id();

    let (text, keyboard) = match command {
        Command::Start => {
            ProfileService::new(state.service_context()).touch(&from.identity()).await?;
            (cards::welcome(from), Some(keyboards::main_menu()))
        }
        Command::Help => (cards::help(&state.rules().ranks), None),
        Command::Id => (cards::id_info(from, &message.chat), None),
        Command::Profile => (profile(state, from).await?, Some(keyboards::back_to_menu())),
        Command::Top => (top(state).await?, None),
        Command::Quests => {
            let (text, markup) = quests(state, from).await?;
            (text, Some(markup))
        }
        Command::Rules => (cards::rules(state.rules()), None),
        Command::HelpAdmin { text } => (notify_admin(state, from, &message.chat, &text).await?.to_string(), None),
        Command::Warn { reason } => {
            return moderate_reply(state, message, from, ModerationRequest::Warn { reason }).await;
        }
        Command::Mute { duration_secs, reason } => {
            let request = ModerationRequest::Mute { duration_secs, reason };
            return moderate_reply(state, message, from, request).await;
        }
        Command::Ban { duration_secs, reason } => {
            let request = ModerationRequest::Ban { duration_secs, reason };
            return moderate_reply(state, message, from, request).await;
        }
        Command::Amnesty => {
            return moderate_reply(state, message, from, ModerationRequest::Amnesty).await;
        }
    };

    let mut reply = OutgoingMessage::html(chat, text).reply_to(message.message_id);
    if let Some(markup) = keyboard {
        reply = reply.keyboard(markup);
    }
    state.send(reply).await?;
    Ok(())
}

async fn moderate_reply(
    state: &BotState,
    message: &Message,
    from: &User,
    request: ModerationRequest,
) -> HandlerResult<()> {
    let text = match message.reply_author() {
        None => REPLY_HINT.to_string(),
        Some(target) if target.id == from.id => "🙃 You can't moderate yourself".to_string(),
        Some(target) => {
            info!(moderator = from.id, target = target.id, request = ?request, "Moderation command");
            moderate(state, &request, from, target, message.chat.chat_id()).await?
        }
    };
    state.reply(message, text).await?;
    Ok(())
}

/// Profile card of `user`, refreshing their stored identity first
pub(super) async fn profile(state: &BotState, user: &User) -> HandlerResult<String> {
    let profiles = ProfileService::new(state.service_context());
    profiles.touch(&user.identity()).await?;
    let view = profiles.profile(user.user_id()).await?;
    Ok(cards::profile_card(&view, state.rules()))
}

pub(super) async fn top(state: &BotState) -> HandlerResult<String> {
    let members = ProfileService::new(state.service_context()).top(TOP_LIMIT).await?;
    Ok(cards::top_list(&members, &state.rules().ranks))
}

pub(super) async fn quests(state: &BotState, user: &User) -> HandlerResult<(String, InlineKeyboardMarkup)> {
    let board = QuestService::new(state.service_context()).board(user.user_id()).await?;
    Ok((cards::quest_board(&board), keyboards::quests(&board)))
}
