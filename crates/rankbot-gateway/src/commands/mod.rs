//! Slash commands and callback payloads

mod callback;
mod duration;

pub use callback::{Callback, MUTE_30MIN_SECS, MUTE_5MIN_SECS, MUTE_7DAYS_SECS};
pub use duration::parse_duration;

use thiserror::Error;

/// A recognised slash command with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Id,
    Profile,
    Top,
    Quests,
    Rules,
    Mute { duration_secs: u64, reason: String },
    Warn { reason: String },
    Ban { duration_secs: u64, reason: String },
    Amnesty,
    HelpAdmin { text: String },
}

/// A command was recognised but its arguments are unusable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Usage: /{command} <duration> [reason], e.g. /{command} 10m flood")]
    MissingDuration { command: &'static str },

    #[error("Can't read duration \"{0}\". Use seconds or 30s, 5m, 2h, 7d")]
    InvalidDuration(String),
}

impl Command {
    /// Parse a message text.
    ///
    /// Returns `None` for plain text, unknown commands and commands addressed
    /// to another bot (`/cmd@OtherBot`).
    pub fn parse(text: &str, bot_username: &str) -> Option<Result<Self, CommandError>> {
        let text = text.trim();
        let rest = text.strip_prefix('/')?;
        let (head, args) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(head, args)| (head, args.trim()));

        let name = match head.split_once('@') {
            Some((name, target)) if target.eq_ignore_ascii_case(bot_username) => name,
            Some(_) => return None,
            None => head,
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "id" => Self::Id,
            "profile" => Self::Profile,
            "top" => Self::Top,
            "quests" => Self::Quests,
            "rules" => Self::Rules,
            "warn" => Self::Warn {
                reason: args.to_string(),
            },
            "amnesty" => Self::Amnesty,
            "helpadmin" => Self::HelpAdmin {
                text: args.to_string(),
            },
            "mute" => {
                return Some(
                    duration_args("mute", args).map(|(duration_secs, reason)| Self::Mute { duration_secs, reason }),
                )
            }
            "ban" => {
                return Some(
                    duration_args("ban", args).map(|(duration_secs, reason)| Self::Ban { duration_secs, reason }),
                )
            }
            _ => return None,
        };
        Some(Ok(command))
    }

    /// Whether the command acts on the author of the replied-to message
    pub fn needs_reply_target(&self) -> bool {
        matches!(
            self,
            Self::Mute { .. } | Self::Warn { .. } | Self::Ban { .. } | Self::Amnesty
        )
    }
}

fn duration_args(command: &'static str, args: &str) -> Result<(u64, String), CommandError> {
    let (first, reason) = args
        .split_once(char::is_whitespace)
        .map_or((args, ""), |(first, reason)| (first, reason.trim()));

    if first.is_empty() {
        return Err(CommandError::MissingDuration { command });
    }
    let secs = parse_duration(first).ok_or_else(|| CommandError::InvalidDuration(first.to_string()))?;
    Ok((secs, reason.to_string()))
}
