//! Service layer for the chat fabric.

use crate::chat::{
    domain::{Chat, ChatDomainError, ChatId, ChatMessage, MessageKind},
    ports::{ChatRepository, ChatRepositoryError},
};
use crate::error::{Classify, ErrorKind, trace_failure};
use crate::offer::domain::OfferId;
use crate::profile::{
    domain::ProfileId,
    ports::{ProfileDirectory, ProfileDirectoryError},
};
use crate::task::domain::TaskId;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for opening the chat of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenChatRequest {
    /// Parent task.
    pub task_id: TaskId,
    /// The task's customer.
    pub customer_id: ProfileId,
    /// The bidding provider.
    pub provider_id: ProfileId,
    /// The offer the chat belongs to.
    pub offer_id: OfferId,
}

/// Request payload for posting a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMessageRequest {
    chat_id: ChatId,
    sender_id: ProfileId,
    body: String,
    kind: MessageKind,
}

impl PostMessageRequest {
    /// Creates a request for a participant's free-text message.
    #[must_use]
    pub fn text(chat_id: ChatId, sender_id: ProfileId, body: impl Into<String>) -> Self {
        Self {
            chat_id,
            sender_id,
            body: body.into(),
            kind: MessageKind::Text,
        }
    }

    /// Overrides the message kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }
}

/// A chat together with its participants' display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOverview {
    /// The chat record.
    pub chat: Chat,
    /// Customer display name, empty when the profile is unknown.
    pub customer_name: String,
    /// Provider display name, empty when the profile is unknown.
    pub provider_name: String,
}

/// Service-level errors for chat operations.
#[derive(Debug, Error)]
pub enum ChatServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ChatDomainError),
    /// The chat does not exist.
    #[error("chat not found: {0}")]
    NotFound(ChatId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ChatRepositoryError),
    /// Profile lookup failed.
    #[error(transparent)]
    Directory(#[from] ProfileDirectoryError),
}

impl Classify for ChatServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(ChatDomainError::EmptyBody) => ErrorKind::Validation,
            Self::Domain(ChatDomainError::Inactive(_))
            | Self::Repository(
                ChatRepositoryError::DuplicateChat(_) | ChatRepositoryError::Inactive(_),
            ) => ErrorKind::Conflict,
            Self::NotFound(_) | Self::Repository(ChatRepositoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::Domain(ChatDomainError::TemplateRender { .. })
            | Self::Repository(ChatRepositoryError::Persistence(_))
            | Self::Directory(_) => ErrorKind::Store,
        }
    }
}

/// Result type for chat service operations.
pub type ChatServiceResult<T> = Result<T, ChatServiceError>;

/// Chat orchestration service.
#[derive(Clone)]
pub struct ChatService<R, D, C>
where
    R: ChatRepository,
    D: ProfileDirectory,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<R, D, C> ChatService<R, D, C>
where
    R: ChatRepository,
    D: ProfileDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new chat service.
    #[must_use]
    pub const fn new(repository: Arc<R>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            repository,
            directory,
            clock,
        }
    }

    /// Opens the active chat for an offer.
    ///
    /// # Errors
    ///
    /// Returns [`ChatRepositoryError::DuplicateChat`] wrapped in
    /// [`ChatServiceError::Repository`] when the offer already has a chat.
    pub async fn create_for_offer(&self, request: OpenChatRequest) -> ChatServiceResult<Chat> {
        let chat = Chat::new(
            request.task_id,
            request.customer_id,
            request.provider_id,
            request.offer_id,
            &*self.clock,
        );
        if let Err(err) = self.repository.store(&chat).await {
            let failure = ChatServiceError::from(err);
            trace_failure("chat.create_for_offer", &failure);
            return Err(failure);
        }
        tracing::debug!(chat_id = %chat.id(), offer_id = %chat.offer_id(), "chat opened");
        Ok(chat)
    }

    /// Deactivates every chat of `task_id` except the one for `keep_offer`.
    ///
    /// Returns how many chats changed.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::Repository`] when the store fails.
    pub async fn deactivate_siblings(
        &self,
        task_id: TaskId,
        keep_offer: OfferId,
    ) -> ChatServiceResult<usize> {
        let changed = self
            .repository
            .deactivate_siblings(task_id, keep_offer, self.clock.utc())
            .await?;
        tracing::debug!(task_id = %task_id, changed, "sibling chats deactivated");
        Ok(changed)
    }

    /// Posts a message to a chat.
    ///
    /// Text messages require an active chat; offer updates and system
    /// messages do not.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError`] when the text is blank, the chat does not
    /// exist, or a text message targets an inactive chat.
    pub async fn post_message(
        &self,
        request: PostMessageRequest,
    ) -> ChatServiceResult<ChatMessage> {
        let result = self.post_message_inner(request).await;
        if let Err(err) = &result {
            trace_failure("chat.post_message", err);
        }
        result
    }

    async fn post_message_inner(
        &self,
        request: PostMessageRequest,
    ) -> ChatServiceResult<ChatMessage> {
        let message = ChatMessage::new(
            request.chat_id,
            request.sender_id,
            request.body,
            request.kind,
            &*self.clock,
        )?;
        self.repository
            .append_message(&message, request.kind.requires_active_chat())
            .await
            .map_err(|err| match err {
                ChatRepositoryError::NotFound(id) => ChatServiceError::NotFound(id),
                ChatRepositoryError::Inactive(id) => ChatDomainError::Inactive(id).into(),
                other => other.into(),
            })?;
        Ok(message)
    }

    /// Flags the messages `reader` has received in a chat as read.
    ///
    /// Returns how many messages changed; a repeated call returns zero.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::NotFound`] when the chat does not exist.
    pub async fn mark_read(&self, chat_id: ChatId, reader: ProfileId) -> ChatServiceResult<usize> {
        let result = match self.repository.mark_read(chat_id, reader).await {
            Ok(count) => Ok(count),
            Err(ChatRepositoryError::NotFound(id)) => Err(ChatServiceError::NotFound(id)),
            Err(other) => Err(other.into()),
        };
        if let Err(err) = &result {
            trace_failure("chat.mark_read", err);
        }
        result
    }

    /// Counts unread messages addressed to `profile` across its active chats.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::Repository`] when the store fails.
    pub async fn unread_count(&self, profile: ProfileId) -> ChatServiceResult<usize> {
        Ok(self.repository.unread_count(profile).await?)
    }

    /// Lists the chats `profile` takes part in, most recent activity first.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError`] when the store or directory fails.
    pub async fn list_for_user(&self, profile: ProfileId) -> ChatServiceResult<Vec<ChatOverview>> {
        let chats = self.repository.list_for_participant(profile).await?;
        let mut ids: Vec<ProfileId> = chats
            .iter()
            .flat_map(|chat| [chat.customer_id(), chat.provider_id()])
            .collect();
        ids.sort_unstable();
        ids.dedup();
        let names = self.directory.display_names(&ids).await?;

        Ok(chats
            .into_iter()
            .map(|chat| ChatOverview {
                customer_name: names.get(&chat.customer_id()).cloned().unwrap_or_default(),
                provider_name: names.get(&chat.provider_id()).cloned().unwrap_or_default(),
                chat,
            })
            .collect())
    }

    /// Lists a chat's messages oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::NotFound`] when the chat does not exist.
    pub async fn messages(&self, chat_id: ChatId) -> ChatServiceResult<Vec<ChatMessage>> {
        if self.repository.find_by_id(chat_id).await?.is_none() {
            return Err(ChatServiceError::NotFound(chat_id));
        }
        Ok(self.repository.list_messages(chat_id).await?)
    }
}
