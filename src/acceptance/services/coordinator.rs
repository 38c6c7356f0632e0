//! Acceptance coordinator service.

use crate::acceptance::{
    domain::{AcceptOffer, AcceptedOffer},
    ports::{AcceptanceRepository, AcceptanceRepositoryError},
};
use crate::chat::domain::{ChatDomainError, render_match_announcement};
use crate::error::{Classify, ErrorKind, trace_failure};
use crate::offer::{
    domain::{OfferDomainError, OfferId},
    ports::{OfferRepository, OfferRepositoryError},
};
use crate::profile::ports::{ProfileDirectory, ProfileDirectoryError};
use crate::task::{
    domain::TaskId,
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

const UNKNOWN_PROVIDER_NAME: &str = "Your service provider";

/// Service-level errors for offer acceptance.
#[derive(Debug, Error)]
pub enum AcceptanceError {
    /// The offer does not exist.
    #[error("offer not found: {0}")]
    OfferNotFound(OfferId),
    /// The offer's task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The offer has already been resolved.
    #[error(transparent)]
    Offer(#[from] OfferDomainError),
    /// The announcement could not be rendered.
    #[error(transparent)]
    Chat(#[from] ChatDomainError),
    /// The acceptance write failed.
    #[error(transparent)]
    Repository(#[from] AcceptanceRepositoryError),
    /// Offer lookup failed.
    #[error(transparent)]
    Offers(#[from] OfferRepositoryError),
    /// Task lookup failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// Profile lookup failed.
    #[error(transparent)]
    Directory(#[from] ProfileDirectoryError),
}

impl Classify for AcceptanceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::OfferNotFound(_)
            | Self::TaskNotFound(_)
            | Self::Repository(
                AcceptanceRepositoryError::OfferNotFound(_)
                | AcceptanceRepositoryError::TaskNotFound(_),
            ) => ErrorKind::NotFound,
            Self::Offer(_)
            | Self::Repository(
                AcceptanceRepositoryError::AlreadyResolved { .. }
                | AcceptanceRepositoryError::TaskNotOpen { .. },
            ) => ErrorKind::Conflict,
            Self::Chat(_)
            | Self::Repository(
                AcceptanceRepositoryError::ChatMissing(_)
                | AcceptanceRepositoryError::Persistence(_),
            )
            | Self::Offers(_)
            | Self::Tasks(_)
            | Self::Directory(_) => ErrorKind::Store,
        }
    }
}

/// Result type for acceptance operations.
pub type AcceptanceResult<T> = Result<T, AcceptanceError>;

/// Coordinates the acceptance of an offer across tasks, offers, and chats.
#[derive(Clone)]
pub struct AcceptanceCoordinator<A, O, T, D, C>
where
    A: AcceptanceRepository,
    O: OfferRepository,
    T: TaskRepository,
    D: ProfileDirectory,
    C: Clock + Send + Sync,
{
    acceptance: Arc<A>,
    offers: Arc<O>,
    tasks: Arc<T>,
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<A, O, T, D, C> AcceptanceCoordinator<A, O, T, D, C>
where
    A: AcceptanceRepository,
    O: OfferRepository,
    T: TaskRepository,
    D: ProfileDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new acceptance coordinator.
    #[must_use]
    pub const fn new(
        acceptance: Arc<A>,
        offers: Arc<O>,
        tasks: Arc<T>,
        directory: Arc<D>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            acceptance,
            offers,
            tasks,
            directory,
            clock,
        }
    }

    /// Accepts a pending offer and matches its task with the provider.
    ///
    /// The task, all offers and chats of the task, and the accepted chat's
    /// system message are written as one unit. A repeated or concurrent
    /// accept on the same task fails with a conflict and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError`] when the offer is unknown, already
    /// resolved, its task is no longer open, or the store fails.
    pub async fn accept_offer(&self, offer_id: OfferId) -> AcceptanceResult<AcceptedOffer> {
        let result = self.accept_offer_inner(offer_id).await;
        match &result {
            Ok(accepted) => tracing::info!(
                offer_id = %accepted.offer_id,
                task_id = %accepted.task_id,
                provider_id = %accepted.provider_id,
                chat_id = %accepted.chat_id,
                "offer accepted"
            ),
            Err(err) => trace_failure("acceptance.accept_offer", err),
        }
        result
    }

    async fn accept_offer_inner(&self, offer_id: OfferId) -> AcceptanceResult<AcceptedOffer> {
        let offer = self
            .offers
            .find_by_id(offer_id)
            .await?
            .ok_or(AcceptanceError::OfferNotFound(offer_id))?;
        offer.ensure_pending()?;
        let task = self
            .tasks
            .find_by_id(offer.task_id())
            .await?
            .ok_or(AcceptanceError::TaskNotFound(offer.task_id()))?;

        let names = self.directory.display_names(&[offer.provider_id()]).await?;
        let provider_name = names
            .get(&offer.provider_id())
            .map_or(UNKNOWN_PROVIDER_NAME, String::as_str);
        let announcement = render_match_announcement(task.details().title(), provider_name)?;

        let command = AcceptOffer {
            offer_id,
            announcement,
            accepted_at: self.clock.utc(),
        };
        Ok(self.acceptance.accept(&command).await?)
    }
}
