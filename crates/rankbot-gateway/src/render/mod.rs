//! Message rendering
//!
//! Everything the bot says is built here, in Telegram HTML.

pub mod cards;
pub mod keyboards;
mod text;

pub use text::{escape_html, format_duration, progress_bar};
