//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Unknown quest: {0}")]
    UnknownQuest(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid rules: {0}")]
    InvalidRules(String),

    #[error("Invalid moderation action: {0}")]
    InvalidModerationAction(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Get an error code string for logs and responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownQuest(_) => "UNKNOWN_QUEST",
            Self::InvalidRules(_) => "INVALID_RULES",
            Self::InvalidModerationAction(_) => "INVALID_MODERATION_ACTION",
            Self::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownQuest(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidRules(_) | Self::InvalidModerationAction(_)
        )
    }

    /// Shorthand for rule-table validation failures
    pub fn invalid_rules(msg: impl Into<String>) -> Self {
        Self::InvalidRules(msg.into())
    }
}
