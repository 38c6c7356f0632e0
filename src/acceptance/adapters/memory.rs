//! In-memory acceptance under the shared write lock.

use async_trait::async_trait;

use crate::acceptance::{
    domain::{AcceptOffer, AcceptedOffer},
    ports::{AcceptanceRepository, AcceptanceRepositoryError, AcceptanceRepositoryResult},
};
use crate::chat::adapters::memory::deactivate_siblings;
use crate::chat::domain::{ChatMessage, MessageKind};
use crate::store::InMemoryStore;

/// Acceptance repository over the shared in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAcceptanceRepository {
    store: InMemoryStore,
}

impl InMemoryAcceptanceRepository {
    /// Creates a repository sharing `store` with other adapters.
    #[must_use]
    pub const fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AcceptanceRepository for InMemoryAcceptanceRepository {
    async fn accept(&self, command: &AcceptOffer) -> AcceptanceRepositoryResult<AcceptedOffer> {
        let mut tables = self
            .store
            .write()
            .map_err(AcceptanceRepositoryError::persistence)?;
        let at = command.accepted_at;

        // Validate every precondition on copies before touching any row.
        let mut offer = tables
            .offer(command.offer_id)
            .cloned()
            .ok_or(AcceptanceRepositoryError::OfferNotFound(command.offer_id))?;
        let mut task = tables
            .task(offer.task_id())
            .cloned()
            .ok_or(AcceptanceRepositoryError::TaskNotFound(offer.task_id()))?;
        offer
            .accept(at)
            .map_err(|_| AcceptanceRepositoryError::AlreadyResolved {
                offer_id: offer.id(),
                status: offer.status(),
            })?;
        task.accept(offer.provider_id(), at)
            .map_err(|_| AcceptanceRepositoryError::TaskNotOpen {
                task_id: task.id(),
                status: task.status(),
            })?;
        let chat_id = tables
            .chats
            .iter()
            .find(|chat| chat.offer_id() == offer.id())
            .map(|chat| chat.id())
            .ok_or(AcceptanceRepositoryError::ChatMissing(offer.id()))?;
        let announcement = ChatMessage::new_at(
            chat_id,
            task.created_by(),
            command.announcement.as_str(),
            MessageKind::System,
            at,
        )
        .map_err(AcceptanceRepositoryError::persistence)?;

        let accepted = AcceptedOffer {
            task_id: task.id(),
            offer_id: offer.id(),
            provider_id: offer.provider_id(),
            chat_id,
        };

        if let Some(stored) = tables.task_mut(accepted.task_id) {
            *stored = task;
        }
        for other in tables.offers.iter_mut().filter(|other| {
            other.task_id() == accepted.task_id && other.id() != accepted.offer_id
        }) {
            other.reject(at);
        }
        if let Some(stored) = tables.offer_mut(accepted.offer_id) {
            *stored = offer;
        }
        deactivate_siblings(&mut tables, accepted.task_id, accepted.offer_id, at);
        if let Some(chat) = tables.chat_mut(chat_id) {
            chat.touch(at);
        }
        tables.messages.push(announcement);
        Ok(accepted)
    }
}
