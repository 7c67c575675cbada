//! Handler error types

use rankbot_service::ServiceError;
use thiserror::Error;

use crate::telegram::TelegramError;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Storage or lookup failure inside a service
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// A reply or answer could not be delivered
    #[error("Telegram error: {0}")]
    Telegram(#[from] TelegramError),
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
