//! Repository port for chats and messages.

use crate::chat::domain::{Chat, ChatId, ChatMessage};
use crate::offer::domain::OfferId;
use crate::profile::domain::ProfileId;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for chat repository operations.
pub type ChatRepositoryResult<T> = Result<T, ChatRepositoryError>;

/// Chat and message persistence contract.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Stores a new chat.
    ///
    /// # Errors
    ///
    /// Returns [`ChatRepositoryError::DuplicateChat`] when the offer already
    /// has a chat.
    async fn store(&self, chat: &Chat) -> ChatRepositoryResult<()>;

    /// Finds a chat by identifier.
    async fn find_by_id(&self, id: ChatId) -> ChatRepositoryResult<Option<Chat>>;

    /// Finds the chat belonging to an offer.
    async fn find_by_offer(&self, offer_id: OfferId) -> ChatRepositoryResult<Option<Chat>>;

    /// Lists chats where `profile` is a participant, most recent activity
    /// first.
    async fn list_for_participant(&self, profile: ProfileId) -> ChatRepositoryResult<Vec<Chat>>;

    /// Appends a message and moves the chat's `updated_at` to the message
    /// timestamp in the same write. Returns the updated chat.
    ///
    /// # Errors
    ///
    /// Returns [`ChatRepositoryError::NotFound`] when the chat does not exist
    /// and [`ChatRepositoryError::Inactive`] when `require_active` is set and
    /// the chat has been deactivated.
    async fn append_message(
        &self,
        message: &ChatMessage,
        require_active: bool,
    ) -> ChatRepositoryResult<Chat>;

    /// Lists a chat's messages oldest first.
    async fn list_messages(&self, chat_id: ChatId) -> ChatRepositoryResult<Vec<ChatMessage>>;

    /// Flags every unread message not sent by `reader` as read and returns
    /// how many changed.
    ///
    /// # Errors
    ///
    /// Returns [`ChatRepositoryError::NotFound`] when the chat does not exist.
    async fn mark_read(&self, chat_id: ChatId, reader: ProfileId) -> ChatRepositoryResult<usize>;

    /// Counts unread messages addressed to `profile` across its active chats.
    async fn unread_count(&self, profile: ProfileId) -> ChatRepositoryResult<usize>;

    /// Deactivates every chat of `task_id` except the one for `keep_offer`
    /// and returns how many changed.
    async fn deactivate_siblings(
        &self,
        task_id: TaskId,
        keep_offer: OfferId,
        timestamp: DateTime<Utc>,
    ) -> ChatRepositoryResult<usize>;
}

/// Errors returned by chat repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ChatRepositoryError {
    /// The offer already has a chat.
    #[error("offer {0} already has a chat")]
    DuplicateChat(OfferId),

    /// The chat was not found.
    #[error("chat not found: {0}")]
    NotFound(ChatId),

    /// The chat does not accept user messages.
    #[error("chat {0} is inactive")]
    Inactive(ChatId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ChatRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
