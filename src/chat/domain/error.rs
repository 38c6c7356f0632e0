//! Error types for chat domain validation.

use super::ChatId;
use thiserror::Error;

/// Errors returned while constructing chats and messages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatDomainError {
    /// The message body is empty after trimming.
    #[error("message text must not be empty")]
    EmptyBody,

    /// The chat no longer accepts user messages.
    #[error("chat {0} is inactive")]
    Inactive(ChatId),

    /// A message template failed to render.
    #[error("failed to render {template} message: {reason}")]
    TemplateRender {
        /// Template name.
        template: &'static str,
        /// Renderer error description.
        reason: String,
    },
}

/// Error returned while parsing message kinds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown message kind: {0}")]
pub struct ParseMessageKindError(pub String);
