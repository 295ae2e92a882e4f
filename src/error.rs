//! Error types for the chat backend.

use crate::types::{ConversationId, MessageId, UserId};
use thiserror::Error;

/// Main error type for chat operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl ChatError {
    /// True for the not-found family, which callers must be able to tell
    /// apart from storage failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ChatError::UserNotFound(_)
                | ChatError::ConversationNotFound(_)
                | ChatError::MessageNotFound(_)
        )
    }
}

/// Result type for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;
