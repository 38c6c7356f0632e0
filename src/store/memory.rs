//! Shared in-memory tables backing every in-memory adapter.
//!
//! All contexts share one lock so operations spanning several tables (offer
//! placement, offer acceptance) observe and mutate a consistent snapshot.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::chat::domain::{Chat, ChatId, ChatMessage};
use crate::offer::domain::{Offer, OfferId};
use crate::profile::domain::{Profile, ProfileId};
use crate::task::domain::{Task, TaskId};

/// Error raised when the shared lock has been poisoned by a panicking writer.
#[derive(Debug, Clone, thiserror::Error)]
#[error("in-memory store lock poisoned: {0}")]
pub struct PoisonedStore(String);

/// Row storage for the in-memory marketplace.
///
/// Vectors keep insertion order so listings tie-break like a sequence column.
#[derive(Debug, Default)]
pub struct MemoryTables {
    /// Profiles keyed by identifier.
    pub profiles: HashMap<ProfileId, Profile>,
    /// Tasks in insertion order.
    pub tasks: Vec<Task>,
    /// Offers in insertion order.
    pub offers: Vec<Offer>,
    /// Chats in insertion order.
    pub chats: Vec<Chat>,
    /// Messages in insertion order.
    pub messages: Vec<ChatMessage>,
}

impl MemoryTables {
    /// Returns a mutable task row.
    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    /// Returns a task row.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Returns an offer row.
    #[must_use]
    pub fn offer(&self, id: OfferId) -> Option<&Offer> {
        self.offers.iter().find(|offer| offer.id() == id)
    }

    /// Returns a mutable offer row.
    pub fn offer_mut(&mut self, id: OfferId) -> Option<&mut Offer> {
        self.offers.iter_mut().find(|offer| offer.id() == id)
    }

    /// Returns a chat row.
    #[must_use]
    pub fn chat(&self, id: ChatId) -> Option<&Chat> {
        self.chats.iter().find(|chat| chat.id() == id)
    }

    /// Returns a mutable chat row.
    pub fn chat_mut(&mut self, id: ChatId) -> Option<&mut Chat> {
        self.chats.iter_mut().find(|chat| chat.id() == id)
    }
}

/// Cloneable handle to the shared in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<MemoryTables>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires shared read access.
    ///
    /// # Errors
    ///
    /// Returns [`PoisonedStore`] if a writer panicked while holding the lock.
    pub fn read(&self) -> Result<RwLockReadGuard<'_, MemoryTables>, PoisonedStore> {
        self.tables
            .read()
            .map_err(|err| PoisonedStore(err.to_string()))
    }

    /// Acquires exclusive write access.
    ///
    /// # Errors
    ///
    /// Returns [`PoisonedStore`] if a writer panicked while holding the lock.
    pub fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryTables>, PoisonedStore> {
        self.tables
            .write()
            .map_err(|err| PoisonedStore(err.to_string()))
    }
}
