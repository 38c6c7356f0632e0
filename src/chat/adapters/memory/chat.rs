//! In-memory repository for chats and messages.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;

use crate::chat::{
    domain::{Chat, ChatId, ChatMessage},
    ports::{ChatRepository, ChatRepositoryError, ChatRepositoryResult},
};
use crate::offer::domain::OfferId;
use crate::profile::domain::ProfileId;
use crate::store::{InMemoryStore, MemoryTables};
use crate::task::domain::TaskId;

/// Thread-safe in-memory chat repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatRepository {
    store: InMemoryStore,
}

impl InMemoryChatRepository {
    /// Creates a repository sharing `store` with other adapters.
    #[must_use]
    pub const fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

/// Deactivates the chats of `task_id` other than the one for `keep_offer`.
pub(crate) fn deactivate_siblings(
    tables: &mut MemoryTables,
    task_id: TaskId,
    keep_offer: OfferId,
    timestamp: DateTime<Utc>,
) -> usize {
    tables
        .chats
        .iter_mut()
        .filter(|chat| chat.task_id() == task_id && chat.offer_id() != keep_offer)
        .map(|chat| chat.deactivate(timestamp))
        .filter(|changed| *changed)
        .count()
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn store(&self, chat: &Chat) -> ChatRepositoryResult<()> {
        let mut tables = self.store.write().map_err(ChatRepositoryError::persistence)?;
        if tables
            .chats
            .iter()
            .any(|existing| existing.offer_id() == chat.offer_id())
        {
            return Err(ChatRepositoryError::DuplicateChat(chat.offer_id()));
        }
        tables.chats.push(chat.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ChatId) -> ChatRepositoryResult<Option<Chat>> {
        let tables = self.store.read().map_err(ChatRepositoryError::persistence)?;
        Ok(tables.chat(id).cloned())
    }

    async fn find_by_offer(&self, offer_id: OfferId) -> ChatRepositoryResult<Option<Chat>> {
        let tables = self.store.read().map_err(ChatRepositoryError::persistence)?;
        Ok(tables
            .chats
            .iter()
            .find(|chat| chat.offer_id() == offer_id)
            .cloned())
    }

    async fn list_for_participant(&self, profile: ProfileId) -> ChatRepositoryResult<Vec<Chat>> {
        let tables = self.store.read().map_err(ChatRepositoryError::persistence)?;
        let mut chats: Vec<Chat> = tables
            .chats
            .iter()
            .rev()
            .filter(|chat| chat.has_participant(profile))
            .cloned()
            .collect();
        chats.sort_by_key(|chat| Reverse(chat.updated_at()));
        Ok(chats)
    }

    async fn append_message(
        &self,
        message: &ChatMessage,
        require_active: bool,
    ) -> ChatRepositoryResult<Chat> {
        let mut tables = self.store.write().map_err(ChatRepositoryError::persistence)?;
        let chat = tables
            .chat_mut(message.chat_id())
            .ok_or(ChatRepositoryError::NotFound(message.chat_id()))?;
        if require_active && !chat.is_active() {
            return Err(ChatRepositoryError::Inactive(chat.id()));
        }
        chat.touch(message.created_at());
        let updated = chat.clone();
        tables.messages.push(message.clone());
        Ok(updated)
    }

    async fn list_messages(&self, chat_id: ChatId) -> ChatRepositoryResult<Vec<ChatMessage>> {
        let tables = self.store.read().map_err(ChatRepositoryError::persistence)?;
        let mut messages: Vec<ChatMessage> = tables
            .messages
            .iter()
            .filter(|message| message.chat_id() == chat_id)
            .cloned()
            .collect();
        messages.sort_by_key(ChatMessage::created_at);
        Ok(messages)
    }

    async fn mark_read(&self, chat_id: ChatId, reader: ProfileId) -> ChatRepositoryResult<usize> {
        let mut tables = self.store.write().map_err(ChatRepositoryError::persistence)?;
        if tables.chat(chat_id).is_none() {
            return Err(ChatRepositoryError::NotFound(chat_id));
        }
        let mut flipped = 0;
        for message in tables
            .messages
            .iter_mut()
            .filter(|message| message.chat_id() == chat_id && message.is_unread_for(reader))
        {
            message.mark_read();
            flipped += 1;
        }
        Ok(flipped)
    }

    async fn unread_count(&self, profile: ProfileId) -> ChatRepositoryResult<usize> {
        let tables = self.store.read().map_err(ChatRepositoryError::persistence)?;
        let active_chats: Vec<ChatId> = tables
            .chats
            .iter()
            .filter(|chat| chat.is_active() && chat.has_participant(profile))
            .map(Chat::id)
            .collect();
        Ok(tables
            .messages
            .iter()
            .filter(|message| {
                active_chats.contains(&message.chat_id()) && message.is_unread_for(profile)
            })
            .count())
    }

    async fn deactivate_siblings(
        &self,
        task_id: TaskId,
        keep_offer: OfferId,
        timestamp: DateTime<Utc>,
    ) -> ChatRepositoryResult<usize> {
        let mut tables = self.store.write().map_err(ChatRepositoryError::persistence)?;
        Ok(deactivate_siblings(&mut tables, task_id, keep_offer, timestamp))
    }
}
