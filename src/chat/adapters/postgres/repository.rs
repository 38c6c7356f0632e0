//! `PostgreSQL` repository implementation for chats and messages.

use super::{
    models::{ChatRow, MessageRow},
    queries::{
        deactivate_siblings, find_by_offer, insert_chat, insert_message, lock_for_update,
        row_to_chat, row_to_message,
    },
};
use crate::chat::{
    domain::{Chat, ChatId, ChatMessage},
    ports::{ChatRepository, ChatRepositoryError, ChatRepositoryResult},
};
use crate::offer::domain::OfferId;
use crate::profile::domain::ProfileId;
use crate::store::postgres::{PgPool, get_conn_with, run_blocking_with, unique_violation};
use crate::store::schema::{chat_messages, chats};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed chat repository.
#[derive(Debug, Clone)]
pub struct PostgresChatRepository {
    pool: PgPool,
}

impl PostgresChatRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ChatRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ChatRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, ChatRepositoryError::persistence)?;
                f(&mut connection)
            },
            ChatRepositoryError::persistence,
        )
        .await
    }
}

impl From<diesel::result::Error> for ChatRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl ChatRepository for PostgresChatRepository {
    async fn store(&self, chat: &Chat) -> ChatRepositoryResult<()> {
        let owned = chat.clone();
        self.run_blocking(move |connection| {
            insert_chat(connection, &owned).map_err(|err| match unique_violation(&err) {
                Some(_) => ChatRepositoryError::DuplicateChat(owned.offer_id()),
                None => ChatRepositoryError::persistence(err),
            })
        })
        .await
    }

    async fn find_by_id(&self, id: ChatId) -> ChatRepositoryResult<Option<Chat>> {
        self.run_blocking(move |connection| {
            let row = chats::table
                .find(id.into_inner())
                .select(ChatRow::as_select())
                .first::<ChatRow>(connection)
                .optional()?;
            Ok(row.map(row_to_chat))
        })
        .await
    }

    async fn find_by_offer(&self, offer_id: OfferId) -> ChatRepositoryResult<Option<Chat>> {
        self.run_blocking(move |connection| {
            Ok(find_by_offer(connection, offer_id)?.map(row_to_chat))
        })
        .await
    }

    async fn list_for_participant(&self, profile: ProfileId) -> ChatRepositoryResult<Vec<Chat>> {
        let participant = profile.into_inner();
        self.run_blocking(move |connection| {
            let rows = chats::table
                .filter(
                    chats::customer_id
                        .eq(participant)
                        .or(chats::provider_id.eq(participant)),
                )
                .order((chats::updated_at.desc(), chats::id.desc()))
                .select(ChatRow::as_select())
                .load::<ChatRow>(connection)?;
            Ok(rows.into_iter().map(row_to_chat).collect())
        })
        .await
    }

    async fn append_message(
        &self,
        message: &ChatMessage,
        require_active: bool,
    ) -> ChatRepositoryResult<Chat> {
        let owned = message.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<_, ChatRepositoryError, _>(|tx| {
                let chat = lock_for_update(tx, owned.chat_id())?
                    .ok_or(ChatRepositoryError::NotFound(owned.chat_id()))?;
                if require_active && !chat.active {
                    return Err(ChatRepositoryError::Inactive(owned.chat_id()));
                }
                let updated = insert_message(tx, &owned)?;
                Ok(row_to_chat(updated))
            })
        })
        .await
    }

    async fn list_messages(&self, chat_id: ChatId) -> ChatRepositoryResult<Vec<ChatMessage>> {
        self.run_blocking(move |connection| {
            chat_messages::table
                .filter(chat_messages::chat_id.eq(chat_id.into_inner()))
                .order((chat_messages::created_at.asc(), chat_messages::id.asc()))
                .select(MessageRow::as_select())
                .load::<MessageRow>(connection)?
                .into_iter()
                .map(|row| row_to_message(row).map_err(ChatRepositoryError::persistence))
                .collect()
        })
        .await
    }

    async fn mark_read(&self, chat_id: ChatId, reader: ProfileId) -> ChatRepositoryResult<usize> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, ChatRepositoryError, _>(|tx| {
                let exists = diesel::select(diesel::dsl::exists(
                    chats::table.find(chat_id.into_inner()),
                ))
                .get_result::<bool>(tx)?;
                if !exists {
                    return Err(ChatRepositoryError::NotFound(chat_id));
                }
                let flipped = diesel::update(
                    chat_messages::table
                        .filter(chat_messages::chat_id.eq(chat_id.into_inner()))
                        .filter(chat_messages::sender_id.ne(reader.into_inner()))
                        .filter(chat_messages::is_read.eq(false)),
                )
                .set(chat_messages::is_read.eq(true))
                .execute(tx)?;
                Ok(flipped)
            })
        })
        .await
    }

    async fn unread_count(&self, profile: ProfileId) -> ChatRepositoryResult<usize> {
        let participant = profile.into_inner();
        self.run_blocking(move |connection| {
            let count = chat_messages::table
                .inner_join(chats::table)
                .filter(chats::active.eq(true))
                .filter(
                    chats::customer_id
                        .eq(participant)
                        .or(chats::provider_id.eq(participant)),
                )
                .filter(chat_messages::sender_id.ne(participant))
                .filter(chat_messages::is_read.eq(false))
                .count()
                .get_result::<i64>(connection)?;
            usize::try_from(count).map_err(ChatRepositoryError::persistence)
        })
        .await
    }

    async fn deactivate_siblings(
        &self,
        task_id: TaskId,
        keep_offer: OfferId,
        timestamp: DateTime<Utc>,
    ) -> ChatRepositoryResult<usize> {
        self.run_blocking(move |connection| {
            Ok(deactivate_siblings(connection, task_id, keep_offer, timestamp)?)
        })
        .await
    }
}
