//! Repository port applying an acceptance atomically.

use crate::acceptance::domain::{AcceptOffer, AcceptedOffer};
use crate::offer::domain::{OfferId, OfferStatus};
use crate::task::domain::{TaskId, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for acceptance repository operations.
pub type AcceptanceRepositoryResult<T> = Result<T, AcceptanceRepositoryError>;

/// Store contract for the acceptance transaction.
#[async_trait]
pub trait AcceptanceRepository: Send + Sync {
    /// Applies an acceptance as a single unit.
    ///
    /// Preconditions are re-checked inside the unit; on error nothing is
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceRepositoryError::AlreadyResolved`] when the offer
    /// is no longer pending and [`AcceptanceRepositoryError::TaskNotOpen`]
    /// when the task was matched or closed meanwhile.
    async fn accept(&self, command: &AcceptOffer) -> AcceptanceRepositoryResult<AcceptedOffer>;
}

/// Errors returned by acceptance repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AcceptanceRepositoryError {
    /// The offer was not found.
    #[error("offer not found: {0}")]
    OfferNotFound(OfferId),

    /// The offer's task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The offer has already been resolved.
    #[error("offer {offer_id} already resolved as {status}")]
    AlreadyResolved {
        /// The offer being accepted.
        offer_id: OfferId,
        /// Its status at write time.
        status: OfferStatus,
    },

    /// The task no longer takes a match.
    #[error("task {task_id} is not open (status {status})")]
    TaskNotOpen {
        /// The offer's task.
        task_id: TaskId,
        /// Its status at write time.
        status: TaskStatus,
    },

    /// The offer has no chat.
    #[error("offer {0} has no chat")]
    ChatMissing(OfferId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AcceptanceRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
