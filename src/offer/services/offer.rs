//! Service layer for placing, revising, and listing offers.

use crate::chat::domain::{
    Chat, ChatDomainError, ChatId, ChatMessage, MessageKind, render_offer_interest,
};
use crate::error::{Classify, ErrorKind, trace_failure};
use crate::money::Money;
use crate::offer::{
    domain::{Offer, OfferDomainError, OfferId, OfferRevision},
    ports::{OfferPlacement, OfferRepository, OfferRepositoryError},
};
use crate::profile::{
    domain::ProfileId,
    ports::{ProfileDirectory, ProfileDirectoryError},
};
use crate::task::{
    domain::{TaskDomainError, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for placing an offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOfferRequest {
    /// Task bid on.
    pub task_id: TaskId,
    /// Bidding provider.
    pub provider_id: ProfileId,
    /// Offered price as a decimal string such as `"70.50"`.
    pub price: String,
    /// Note to the customer; may be empty.
    pub message: String,
}

/// Request payload for revising a pending offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOfferRequest {
    offer_id: OfferId,
    price: Option<String>,
    message: Option<String>,
}

impl UpdateOfferRequest {
    /// Creates an empty revision request for `offer_id`.
    #[must_use]
    pub const fn new(offer_id: OfferId) -> Self {
        Self {
            offer_id,
            price: None,
            message: None,
        }
    }

    /// Sets the new price.
    #[must_use]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    /// Sets the new note.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// A freshly placed offer and the chat opened with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOffer {
    /// The pending offer.
    pub offer: Offer,
    /// The offer's chat.
    pub chat_id: ChatId,
}

/// An offer together with its provider's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferListing {
    /// The offer record.
    pub offer: Offer,
    /// Provider display name, empty when the profile is unknown.
    pub provider_name: String,
}

/// Service-level errors for offer operations.
#[derive(Debug, Error)]
pub enum OfferServiceError {
    /// Offer validation failed.
    #[error(transparent)]
    Domain(#[from] OfferDomainError),
    /// The task does not take offers.
    #[error(transparent)]
    Task(#[from] TaskDomainError),
    /// The opening message could not be built.
    #[error(transparent)]
    Chat(#[from] ChatDomainError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The provider profile does not exist.
    #[error("provider profile not found: {0}")]
    ProviderNotFound(ProfileId),
    /// The offer does not exist.
    #[error("offer not found: {0}")]
    NotFound(OfferId),
    /// Offer repository operation failed.
    #[error(transparent)]
    Repository(#[from] OfferRepositoryError),
    /// Task lookup failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// Profile lookup failed.
    #[error(transparent)]
    Directory(#[from] ProfileDirectoryError),
}

impl Classify for OfferServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(OfferDomainError::NotPending { .. }) | Self::Task(_) => {
                ErrorKind::Conflict
            }
            Self::Domain(_) | Self::Chat(ChatDomainError::EmptyBody) => ErrorKind::Validation,
            Self::TaskNotFound(_) | Self::ProviderNotFound(_) | Self::NotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Repository(err) => match err {
                OfferRepositoryError::DuplicateOffer { .. }
                | OfferRepositoryError::DuplicateChat(_)
                | OfferRepositoryError::TaskNotOpen { .. }
                | OfferRepositoryError::NotPending { .. } => ErrorKind::Conflict,
                OfferRepositoryError::NotFound(_) | OfferRepositoryError::TaskNotFound(_) => {
                    ErrorKind::NotFound
                }
                OfferRepositoryError::Persistence(_) => ErrorKind::Store,
            },
            Self::Chat(_) | Self::Tasks(_) | Self::Directory(_) => ErrorKind::Store,
        }
    }
}

/// Result type for offer service operations.
pub type OfferServiceResult<T> = Result<T, OfferServiceError>;

/// Offer orchestration service.
#[derive(Clone)]
pub struct OfferService<R, T, D, C>
where
    R: OfferRepository,
    T: TaskRepository,
    D: ProfileDirectory,
    C: Clock + Send + Sync,
{
    offers: Arc<R>,
    tasks: Arc<T>,
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<R, T, D, C> OfferService<R, T, D, C>
where
    R: OfferRepository,
    T: TaskRepository,
    D: ProfileDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new offer service.
    #[must_use]
    pub const fn new(offers: Arc<R>, tasks: Arc<T>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            offers,
            tasks,
            directory,
            clock,
        }
    }

    /// Places an offer on an open task and opens its chat.
    ///
    /// The offer, the chat, and the provider's opening message are written
    /// together or not at all.
    ///
    /// # Errors
    ///
    /// Returns [`OfferServiceError`] when the price is invalid, the task or
    /// provider is unknown, the task is not open, or the provider already
    /// bid on the task.
    pub async fn create(&self, request: CreateOfferRequest) -> OfferServiceResult<PlacedOffer> {
        let result = self.create_inner(request).await;
        if let Err(err) = &result {
            trace_failure("offer.create", err);
        }
        result
    }

    async fn create_inner(&self, request: CreateOfferRequest) -> OfferServiceResult<PlacedOffer> {
        let price = Money::parse(&request.price).map_err(OfferDomainError::from)?;

        let task = self
            .tasks
            .find_by_id(request.task_id)
            .await?
            .ok_or(OfferServiceError::TaskNotFound(request.task_id))?;
        if self
            .directory
            .find_by_id(request.provider_id)
            .await?
            .is_none()
        {
            return Err(OfferServiceError::ProviderNotFound(request.provider_id));
        }
        task.ensure_open()?;

        let opening_text = render_offer_interest(price, &request.message)?;
        let offer = Offer::new(
            task.id(),
            request.provider_id,
            price,
            request.message,
            &*self.clock,
        );
        let chat = Chat::new(
            task.id(),
            task.created_by(),
            request.provider_id,
            offer.id(),
            &*self.clock,
        );
        let opening = ChatMessage::new(
            chat.id(),
            request.provider_id,
            opening_text,
            MessageKind::OfferUpdate,
            &*self.clock,
        )?;
        let placement = OfferPlacement {
            offer,
            chat,
            opening,
        };

        self.offers.store_with_chat(&placement).await?;
        tracing::info!(
            offer_id = %placement.offer.id(),
            task_id = %placement.offer.task_id(),
            provider_id = %placement.offer.provider_id(),
            "offer placed"
        );
        Ok(PlacedOffer {
            chat_id: placement.chat.id(),
            offer: placement.offer,
        })
    }

    /// Revises the price or note of a pending offer.
    ///
    /// Fields absent from the request keep their stored values.
    ///
    /// # Errors
    ///
    /// Returns [`OfferServiceError`] when no field is supplied, the price is
    /// invalid, the offer is unknown, the offer is resolved, or its task is
    /// no longer open.
    pub async fn update(&self, request: UpdateOfferRequest) -> OfferServiceResult<Offer> {
        let result = self.update_inner(request).await;
        if let Err(err) = &result {
            trace_failure("offer.update", err);
        }
        result
    }

    async fn update_inner(&self, request: UpdateOfferRequest) -> OfferServiceResult<Offer> {
        let price = request
            .price
            .as_deref()
            .map(Money::parse)
            .transpose()
            .map_err(OfferDomainError::from)?;
        let revision = OfferRevision::new(price, request.message)?;

        let offer = self
            .offers
            .find_by_id(request.offer_id)
            .await?
            .ok_or(OfferServiceError::NotFound(request.offer_id))?;
        offer.ensure_pending()?;
        let task = self
            .tasks
            .find_by_id(offer.task_id())
            .await?
            .ok_or(OfferServiceError::TaskNotFound(offer.task_id()))?;
        task.ensure_open()?;

        let updated = self
            .offers
            .update_pending(offer.id(), &revision, self.clock.utc())
            .await?;
        tracing::info!(offer_id = %updated.id(), "offer revised");
        Ok(updated)
    }

    /// Lists the offers on a task, oldest first, with provider names.
    ///
    /// # Errors
    ///
    /// Returns [`OfferServiceError`] when the store or directory fails.
    pub async fn list(&self, task_id: TaskId) -> OfferServiceResult<Vec<OfferListing>> {
        let offers = self.offers.list_for_task(task_id).await?;
        let providers: Vec<ProfileId> = offers.iter().map(Offer::provider_id).collect();
        let names = self.directory.display_names(&providers).await?;

        Ok(offers
            .into_iter()
            .map(|offer| OfferListing {
                provider_name: names.get(&offer.provider_id()).cloned().unwrap_or_default(),
                offer,
            })
            .collect())
    }
}
