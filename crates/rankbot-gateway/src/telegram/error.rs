//! Telegram client error types

use rankbot_core::PlatformError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelegramError {
    /// Request never completed or the body was unreadable
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Bot API answered with `ok: false`
    #[error("Telegram API error {code}: {description}")]
    Api { code: i32, description: String },

    #[error("Telegram API returned no result for {0}")]
    EmptyResult(&'static str),
}

impl TelegramError {
    /// Whether a later retry of the same call could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Api { code, .. } => *code == 429 || *code >= 500,
            Self::EmptyResult(_) => false,
        }
    }
}

impl From<TelegramError> for PlatformError {
    fn from(err: TelegramError) -> Self {
        match err {
            TelegramError::Api { description, .. } => Self::Rejected(description),
            other => Self::Transport(other.to_string()),
        }
    }
}

pub type TelegramResult<T> = Result<T, TelegramError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_errors_become_rejections() {
        let err = TelegramError::Api {
            code: 400,
            description: "Bad Request: not enough rights".to_string(),
        };
        assert!(!err.is_transient());
        assert_eq!(
            PlatformError::from(err),
            PlatformError::Rejected("Bad Request: not enough rights".to_string())
        );
    }

    #[test]
    fn test_rate_limit_is_transient() {
        let err = TelegramError::Api {
            code: 429,
            description: "Too Many Requests".to_string(),
        };
        assert!(err.is_transient());
    }
}
