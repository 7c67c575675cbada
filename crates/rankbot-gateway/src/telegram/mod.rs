//! Telegram Bot API access
//!
//! HTTP client, wire types and the `ChatPlatform` implementation.

mod client;
mod error;
mod platform;
mod types;

pub use client::TelegramClient;
pub use error::{TelegramError, TelegramResult};
pub use types::{
    ApiResponse, CallbackQuery, Chat, ChatPermissions, InlineKeyboardButton, InlineKeyboardMarkup,
    Message, OutgoingMessage, Sticker, Update, User,
};
