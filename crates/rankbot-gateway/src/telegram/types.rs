//! Telegram Bot API objects
//!
//! Only the fields the bot reads or sends are modelled; unknown fields are
//! ignored on deserialization.

use rankbot_core::{ChatId, UserId};
use rankbot_service::dto::MemberIdentity;
use serde::{Deserialize, Serialize};

// ============================================================================
// Incoming
// ============================================================================

/// Envelope of every Bot API response
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl User {
    pub fn user_id(&self) -> UserId {
        UserId::new(self.id)
    }

    /// Full name, falling back to `@username`
    pub fn display_name(&self) -> String {
        match self.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{} {last}", self.first_name),
            _ if !self.first_name.is_empty() => self.first_name.clone(),
            _ => self.username.as_ref().map_or_else(|| self.id.to_string(), |u| format!("@{u}")),
        }
    }

    /// Display identity as stored on the member record
    pub fn identity(&self) -> MemberIdentity {
        MemberIdentity {
            id: self.user_id(),
            username: self.username.clone().unwrap_or_default(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    /// "private", "group", "supergroup" or "channel"
    #[serde(rename = "type")]
    pub kind: String,
    pub title: Option<String>,
}

impl Chat {
    pub fn chat_id(&self) -> ChatId {
        ChatId::new(self.id)
    }

    pub fn is_private(&self) -> bool {
        self.kind == "private"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sticker {
    pub file_id: String,
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub date: i64,
    pub text: Option<String>,
    pub sticker: Option<Sticker>,
    pub reply_to_message: Option<Box<Message>>,
    #[serde(default)]
    pub new_chat_members: Vec<User>,
}

impl Message {
    /// Author of the message this one replies to
    pub fn reply_author(&self) -> Option<&User> {
        self.reply_to_message.as_ref().and_then(|m| m.from.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

// ============================================================================
// Outgoing
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboardButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    pub fn new(rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self { inline_keyboard: rows }
    }

    /// Every callback payload on the keyboard, row by row
    pub fn callbacks(&self) -> impl Iterator<Item = &str> {
        self.inline_keyboard
            .iter()
            .flatten()
            .map(|b| b.callback_data.as_str())
    }
}

/// Member permissions for `restrictChatMember`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChatPermissions {
    pub can_send_messages: bool,
    pub can_send_audios: bool,
    pub can_send_documents: bool,
    pub can_send_photos: bool,
    pub can_send_videos: bool,
    pub can_send_video_notes: bool,
    pub can_send_voice_notes: bool,
    pub can_send_polls: bool,
    pub can_send_other_messages: bool,
    pub can_add_web_page_previews: bool,
}

impl ChatPermissions {
    const fn all(allowed: bool) -> Self {
        Self {
            can_send_messages: allowed,
            can_send_audios: allowed,
            can_send_documents: allowed,
            can_send_photos: allowed,
            can_send_videos: allowed,
            can_send_video_notes: allowed,
            can_send_voice_notes: allowed,
            can_send_polls: allowed,
            can_send_other_messages: allowed,
            can_add_web_page_previews: allowed,
        }
    }

    /// Read-only member
    pub const fn muted() -> Self {
        Self::all(false)
    }

    /// Regular member
    pub const fn member() -> Self {
        Self::all(true)
    }
}

/// `sendMessage` parameters. Text is always HTML.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingMessage {
    pub chat_id: i64,
    pub text: String,
    pub parse_mode: &'static str,
    pub disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl OutgoingMessage {
    pub fn html(chat: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat.into_inner(),
            text: text.into(),
            parse_mode: "HTML",
            disable_web_page_preview: true,
            reply_to_message_id: None,
            reply_markup: None,
        }
    }

    #[must_use]
    pub fn reply_to(mut self, message_id: i64) -> Self {
        self.reply_to_message_id = Some(message_id);
        self
    }

    #[must_use]
    pub fn keyboard(mut self, markup: InlineKeyboardMarkup) -> Self {
        self.reply_markup = Some(markup);
        self
    }
}
