//! In-memory repository for offers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::offer::{
    domain::{Offer, OfferId, OfferRevision},
    ports::{OfferPlacement, OfferRepository, OfferRepositoryError, OfferRepositoryResult},
};
use crate::store::{InMemoryStore, MemoryTables};
use crate::task::domain::{TaskId, TaskStatus};

/// Thread-safe in-memory offer repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOfferRepository {
    store: InMemoryStore,
}

impl InMemoryOfferRepository {
    /// Creates a repository sharing `store` with other adapters.
    #[must_use]
    pub const fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

fn ensure_task_open(tables: &MemoryTables, task_id: TaskId) -> OfferRepositoryResult<()> {
    let task = tables
        .task(task_id)
        .ok_or(OfferRepositoryError::TaskNotFound(task_id))?;
    if task.status() != TaskStatus::Open {
        return Err(OfferRepositoryError::TaskNotOpen {
            task_id,
            status: task.status(),
        });
    }
    Ok(())
}

#[async_trait]
impl OfferRepository for InMemoryOfferRepository {
    async fn store_with_chat(&self, placement: &OfferPlacement) -> OfferRepositoryResult<()> {
        let mut tables = self.store.write().map_err(OfferRepositoryError::persistence)?;
        let offer = &placement.offer;
        ensure_task_open(&tables, offer.task_id())?;

        if tables.offers.iter().any(|existing| {
            existing.task_id() == offer.task_id() && existing.provider_id() == offer.provider_id()
        }) {
            return Err(OfferRepositoryError::DuplicateOffer {
                task_id: offer.task_id(),
                provider_id: offer.provider_id(),
            });
        }
        if tables
            .chats
            .iter()
            .any(|chat| chat.offer_id() == placement.chat.offer_id())
        {
            return Err(OfferRepositoryError::DuplicateChat(placement.chat.offer_id()));
        }

        let mut chat = placement.chat.clone();
        chat.touch(placement.opening.created_at());
        tables.offers.push(offer.clone());
        tables.chats.push(chat);
        tables.messages.push(placement.opening.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: OfferId) -> OfferRepositoryResult<Option<Offer>> {
        let tables = self.store.read().map_err(OfferRepositoryError::persistence)?;
        Ok(tables.offer(id).cloned())
    }

    async fn list_for_task(&self, task_id: TaskId) -> OfferRepositoryResult<Vec<Offer>> {
        let tables = self.store.read().map_err(OfferRepositoryError::persistence)?;
        let mut offers: Vec<Offer> = tables
            .offers
            .iter()
            .filter(|offer| offer.task_id() == task_id)
            .cloned()
            .collect();
        offers.sort_by_key(Offer::created_at);
        Ok(offers)
    }

    async fn update_pending(
        &self,
        id: OfferId,
        revision: &OfferRevision,
        updated_at: DateTime<Utc>,
    ) -> OfferRepositoryResult<Offer> {
        let mut tables = self.store.write().map_err(OfferRepositoryError::persistence)?;
        let task_id = tables
            .offer(id)
            .map(Offer::task_id)
            .ok_or(OfferRepositoryError::NotFound(id))?;
        ensure_task_open(&tables, task_id)?;

        let stored = tables
            .offer_mut(id)
            .ok_or(OfferRepositoryError::NotFound(id))?;
        let mut revised = stored.clone();
        revised
            .revise(revision, updated_at)
            .map_err(|_| OfferRepositoryError::NotPending {
                offer_id: id,
                status: stored.status(),
            })?;
        *stored = revised.clone();
        Ok(revised)
    }
}
