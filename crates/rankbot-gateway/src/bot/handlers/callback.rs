//! Inline keyboard callback handlers
//!
//! Every query is answered exactly once, either silently, with a toast or
//! with an alert, including when the handler fails. Anything longer is
//! posted to the chat.

use rankbot_core::UserId;
use rankbot_service::dto::ReactionOutcome;
use rankbot_service::{ExperienceService, ModerationService, ProfileService, QuestService};
use tracing::{debug, instrument, warn};

use super::command;
use super::{moderate, notify_admin, ModerationRequest, GENERIC_FAILURE};
use crate::bot::error::{HandlerError, HandlerResult};
use crate::bot::state::BotState;
use crate::commands::Callback;
use crate::render::{cards, keyboards};
use crate::telegram::{CallbackQuery, InlineKeyboardMarkup, Message, OutgoingMessage, User};

const MENU_TARGET_HINT: &str =
    "Open this menu under a member's message, or reply to it with /warn, /mute or /ban";

/// How the callback query gets answered
#[derive(Debug, Clone, PartialEq, Eq)]
enum Answer {
    Silent,
    Toast(String),
    Alert(String),
}

#[instrument(skip(state, query), fields(user = query.from.id, data = ?query.data))]
pub async fn handle(state: &BotState, query: &CallbackQuery) -> HandlerResult<()> {
    let callback = query.data.as_deref().and_then(Callback::parse);
    let answer = match (callback, query.message.as_ref()) {
        (Some(callback), Some(message)) => dispatch(state, &query.from, message, callback).await,
        _ => {
            debug!("Unusable callback query");
            Ok(Answer::Silent)
        }
    };

    let (answer, failure) = settle(answer);
    let (text, alert) = match &answer {
        Answer::Silent => (None, false),
        Answer::Toast(text) => (Some(text.as_str()), false),
        Answer::Alert(text) => (Some(text.as_str()), true),
    };
    let sent = state.client().answer_callback_query(&query.id, text, alert).await;

    match failure {
        Some(e) => {
            if let Err(answer_err) = sent {
                warn!(error = %answer_err, "Could not answer failed callback");
            }
            Err(e)
        }
        None => sent.map_err(HandlerError::from),
    }
}

/// Pick the single answer for a handler result.
///
/// User errors become an alert explaining them. Other failures get a
/// generic alert and are handed back for logging.
fn settle(result: HandlerResult<Answer>) -> (Answer, Option<HandlerError>) {
    match result {
        Ok(answer) => (answer, None),
        Err(HandlerError::Service(e)) if e.is_user_error() => (Answer::Alert(e.to_string()), None),
        Err(e) => (Answer::Alert(GENERIC_FAILURE.to_string()), Some(e)),
    }
}

async fn dispatch(state: &BotState, from: &User, message: &Message, callback: Callback) -> HandlerResult<Answer> {
    match callback {
        Callback::Profile => {
            let text = command::profile(state, from).await?;
            post(state, message, text, Some(keyboards::back_to_menu())).await
        }
        Callback::Top => {
            let text = command::top(state).await?;
            post(state, message, text, Some(keyboards::back_to_menu())).await
        }
        Callback::Quests => {
            let (text, markup) = command::quests(state, from).await?;
            post(state, message, text, Some(markup)).await
        }
        Callback::Rules => {
            let text = cards::rules(state.rules());
            post(state, message, text, Some(keyboards::back_to_menu())).await
        }
        Callback::MainMenu => {
            post(state, message, "🏠 <b>Main menu</b>".to_string(), Some(keyboards::main_menu())).await
        }
        Callback::JoinCommunity => {
            ProfileService::new(state.service_context()).touch(&from.identity()).await?;
            Ok(Answer::Toast("✅ Welcome aboard!".to_string()))
        }
        Callback::React { kind, target } => react(state, from, message, &kind, target).await,
        Callback::Quest(quest_id) => {
            let outcome = QuestService::new(state.service_context())
                .complete_quest(from.user_id(), &quest_id)
                .await?;
            Ok(Answer::Alert(cards::quest_result(&outcome, &state.rules().ranks)))
        }
        Callback::Moderation => moderation_menu(state, from, message).await,
        Callback::ModStats => {
            let stats = ModerationService::new(state.service_context())
                .moderator_stats(from.user_id())
                .await?;
            post(state, message, cards::moderator_stats(&stats), None).await
        }
        Callback::HelpAdmin => {
            let text = notify_admin(state, from, &message.chat, "").await?;
            Ok(Answer::Alert(text.to_string()))
        }
        Callback::Mute { duration_secs } => {
            let request = ModerationRequest::Mute {
                duration_secs,
                reason: String::new(),
            };
            menu_action(state, from, message, request).await
        }
        Callback::Warn => {
            menu_action(state, from, message, ModerationRequest::Warn { reason: String::new() }).await
        }
        Callback::Ban => {
            let request = ModerationRequest::Ban {
                duration_secs: state.rules().moderation.auto_ban_duration_secs,
                reason: String::new(),
            };
            menu_action(state, from, message, request).await
        }
        Callback::Amnesty => menu_action(state, from, message, ModerationRequest::Amnesty).await,
    }
}

/// Post `text` in the chat of the pressed button
async fn post(
    state: &BotState,
    message: &Message,
    text: String,
    keyboard: Option<InlineKeyboardMarkup>,
) -> HandlerResult<Answer> {
    let mut outgoing = OutgoingMessage::html(message.chat.chat_id(), text);
    if let Some(markup) = keyboard {
        outgoing = outgoing.keyboard(markup);
    }
    state.send(outgoing).await?;
    Ok(Answer::Silent)
}

async fn react(state: &BotState, from: &User, message: &Message, kind: &str, target: UserId) -> HandlerResult<Answer> {
    let outcome = ExperienceService::new(state.service_context())
        .give_reaction(from.user_id(), target, kind)
        .await?;

    let receipt = match outcome {
        ReactionOutcome::Given(receipt) => receipt,
        ReactionOutcome::Denied(reason) => return Ok(Answer::Alert(reason.to_string())),
    };

    if let Some(tier) = receipt.rank_change.and_then(|c| state.rules().ranks.tier(c.to)) {
        let view = ProfileService::new(state.service_context()).profile(target).await?;
        let text = cards::rank_up(&view.member.display_name(), tier);
        state
            .send(
                OutgoingMessage::html(message.chat.chat_id(), text)
                    .keyboard(keyboards::reactions(target, &state.rules().reactions)),
            )
            .await?;
    }
    Ok(Answer::Toast(cards::reaction_given(&receipt)))
}

/// Open the moderation menu for the presser's rank.
///
/// The menu is posted under the same message as the pressed button so its
/// actions can target that message's author.
async fn moderation_menu(state: &BotState, from: &User, message: &Message) -> HandlerResult<Answer> {
    let member = ProfileService::new(state.service_context()).touch(&from.identity()).await?;
    let markup = keyboards::moderation_menu(member.rank, &state.rules().moderation);

    let mut outgoing = OutgoingMessage::html(message.chat.chat_id(), "🛠️ <b>Moderation</b>").keyboard(markup);
    if let Some(anchor) = &message.reply_to_message {
        outgoing = outgoing.reply_to(anchor.message_id);
    }
    state.send(outgoing).await?;
    Ok(Answer::Silent)
}

/// Moderation menu button: acts on the author of the message the menu sits under
async fn menu_action(
    state: &BotState,
    from: &User,
    message: &Message,
    request: ModerationRequest,
) -> HandlerResult<Answer> {
    let target = message
        .reply_author()
        .filter(|target| target.id != from.id && !target.is_bot);
    let Some(target) = target else {
        return Ok(Answer::Alert(MENU_TARGET_HINT.to_string()));
    };

    let text = moderate(state, &request, from, target, message.chat.chat_id()).await?;
    post(state, message, text, None).await
}
