//! Chat aggregate tying one offer to its two participants.

use super::ChatId;
use crate::offer::domain::OfferId;
use crate::profile::domain::ProfileId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Conversation between a task's customer and one bidding provider.
///
/// # Invariants
///
/// - Exactly one chat exists per offer.
/// - `updated_at` tracks the latest message or state change.
/// - Chats are never deleted; deactivation only clears `active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    id: ChatId,
    task_id: TaskId,
    customer_id: ProfileId,
    provider_id: ProfileId,
    offer_id: OfferId,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedChatData {
    /// Persisted chat identifier.
    pub id: ChatId,
    /// Persisted parent task.
    pub task_id: TaskId,
    /// Persisted customer participant.
    pub customer_id: ProfileId,
    /// Persisted provider participant.
    pub provider_id: ProfileId,
    /// Persisted originating offer.
    pub offer_id: OfferId,
    /// Persisted activity flag.
    pub active: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest activity timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// Opens an active chat for `offer_id`.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        customer_id: ProfileId,
        provider_id: ProfileId,
        offer_id: OfferId,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ChatId::new(),
            task_id,
            customer_id,
            provider_id,
            offer_id,
            active: true,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a chat from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedChatData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            customer_id: data.customer_id,
            provider_id: data.provider_id,
            offer_id: data.offer_id,
            active: data.active,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the chat identifier.
    #[must_use]
    pub const fn id(&self) -> ChatId {
        self.id
    }

    /// Returns the parent task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the customer participant.
    #[must_use]
    pub const fn customer_id(&self) -> ProfileId {
        self.customer_id
    }

    /// Returns the provider participant.
    #[must_use]
    pub const fn provider_id(&self) -> ProfileId {
        self.provider_id
    }

    /// Returns the originating offer.
    #[must_use]
    pub const fn offer_id(&self) -> OfferId {
        self.offer_id
    }

    /// Returns whether the chat accepts user messages.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest activity timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when `profile` is the customer or the provider.
    #[must_use]
    pub fn has_participant(&self, profile: ProfileId) -> bool {
        self.customer_id == profile || self.provider_id == profile
    }

    /// Stops the chat from taking user messages.
    ///
    /// Returns `false` when the chat was already inactive.
    pub fn deactivate(&mut self, timestamp: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.updated_at = timestamp;
        true
    }

    /// Records activity at `timestamp`.
    pub const fn touch(&mut self, timestamp: DateTime<Utc>) {
        self.updated_at = timestamp;
    }
}
