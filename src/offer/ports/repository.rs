//! Repository port for offer persistence.

use crate::chat::domain::{Chat, ChatMessage};
use crate::offer::domain::{Offer, OfferId, OfferRevision, OfferStatus};
use crate::profile::domain::ProfileId;
use crate::task::domain::{TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for offer repository operations.
pub type OfferRepositoryResult<T> = Result<T, OfferRepositoryError>;

/// Rows written together when a provider places an offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferPlacement {
    /// The pending offer.
    pub offer: Offer,
    /// The offer's chat.
    pub chat: Chat,
    /// The provider's opening message in `chat`.
    pub opening: ChatMessage,
}

/// Offer persistence contract.
#[async_trait]
pub trait OfferRepository: Send + Sync {
    /// Stores an offer, its chat, and the opening message in one write.
    ///
    /// The task's status is re-checked inside the write.
    ///
    /// # Errors
    ///
    /// Returns [`OfferRepositoryError::TaskNotOpen`] when the task stopped
    /// taking offers and [`OfferRepositoryError::DuplicateOffer`] when the
    /// provider already bid on the task. Nothing is written on error.
    async fn store_with_chat(&self, placement: &OfferPlacement) -> OfferRepositoryResult<()>;

    /// Finds an offer by identifier.
    async fn find_by_id(&self, id: OfferId) -> OfferRepositoryResult<Option<Offer>>;

    /// Lists the offers on a task, oldest first.
    async fn list_for_task(&self, task_id: TaskId) -> OfferRepositoryResult<Vec<Offer>>;

    /// Applies a revision if the offer is still pending and its task still
    /// open, returning the stored offer.
    ///
    /// # Errors
    ///
    /// Returns [`OfferRepositoryError::NotPending`] or
    /// [`OfferRepositoryError::TaskNotOpen`] when either condition no longer
    /// holds at write time.
    async fn update_pending(
        &self,
        id: OfferId,
        revision: &OfferRevision,
        updated_at: DateTime<Utc>,
    ) -> OfferRepositoryResult<Offer>;
}

/// Errors returned by offer repository implementations.
#[derive(Debug, Clone, Error)]
pub enum OfferRepositoryError {
    /// The provider already placed an offer on the task.
    #[error("provider {provider_id} already made an offer on task {task_id}")]
    DuplicateOffer {
        /// The task bid on.
        task_id: TaskId,
        /// The bidding provider.
        provider_id: ProfileId,
    },

    /// The offer already has a chat.
    #[error("offer {0} already has a chat")]
    DuplicateChat(OfferId),

    /// The offer was not found.
    #[error("offer not found: {0}")]
    NotFound(OfferId),

    /// The offer's task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The task no longer takes offers or revisions.
    #[error("task {task_id} is not accepting offers (status {status})")]
    TaskNotOpen {
        /// The task bid on.
        task_id: TaskId,
        /// Its status at write time.
        status: TaskStatus,
    },

    /// The offer has been resolved.
    #[error("offer {offer_id} is already {status}")]
    NotPending {
        /// The offer being revised.
        offer_id: OfferId,
        /// Its status at write time.
        status: OfferStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl OfferRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
