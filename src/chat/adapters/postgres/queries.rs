//! Chat statements reused inside multi-table transactions.

use super::models::{ChatRow, MessageRow};
use crate::chat::domain::{
    Chat, ChatId, ChatMessage, MessageId, MessageKind, PersistedChatData, PersistedMessageData,
};
use crate::offer::domain::OfferId;
use crate::profile::domain::ProfileId;
use crate::store::schema::{chat_messages, chats};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Inserts a chat row.
pub(crate) fn insert_chat(connection: &mut PgConnection, chat: &Chat) -> QueryResult<()> {
    diesel::insert_into(chats::table)
        .values(&chat_to_row(chat))
        .execute(connection)?;
    Ok(())
}

/// Inserts a message row and moves its chat's `updated_at` to the message
/// timestamp. Returns the updated chat row.
pub(crate) fn insert_message(
    connection: &mut PgConnection,
    message: &ChatMessage,
) -> QueryResult<ChatRow> {
    diesel::insert_into(chat_messages::table)
        .values(&message_to_row(message))
        .execute(connection)?;
    diesel::update(chats::table.find(message.chat_id().into_inner()))
        .set(chats::updated_at.eq(message.created_at()))
        .returning(ChatRow::as_returning())
        .get_result(connection)
}

/// Reads the chat belonging to `offer_id`.
pub(crate) fn find_by_offer(
    connection: &mut PgConnection,
    offer_id: OfferId,
) -> QueryResult<Option<ChatRow>> {
    chats::table
        .filter(chats::offer_id.eq(offer_id.into_inner()))
        .select(ChatRow::as_select())
        .first::<ChatRow>(connection)
        .optional()
}

/// Reads a chat row and locks it until commit.
pub(crate) fn lock_for_update(
    connection: &mut PgConnection,
    id: ChatId,
) -> QueryResult<Option<ChatRow>> {
    chats::table
        .find(id.into_inner())
        .select(ChatRow::as_select())
        .for_update()
        .first::<ChatRow>(connection)
        .optional()
}

/// Deactivates the active chats of `task_id` other than the one for
/// `keep_offer`. Returns the number of rows changed.
pub(crate) fn deactivate_siblings(
    connection: &mut PgConnection,
    task_id: TaskId,
    keep_offer: OfferId,
    timestamp: DateTime<Utc>,
) -> QueryResult<usize> {
    diesel::update(
        chats::table
            .filter(chats::task_id.eq(task_id.into_inner()))
            .filter(chats::offer_id.ne(keep_offer.into_inner()))
            .filter(chats::active.eq(true)),
    )
    .set((chats::active.eq(false), chats::updated_at.eq(timestamp)))
    .execute(connection)
}

fn chat_to_row(chat: &Chat) -> ChatRow {
    ChatRow {
        id: chat.id().into_inner(),
        task_id: chat.task_id().into_inner(),
        customer_id: chat.customer_id().into_inner(),
        provider_id: chat.provider_id().into_inner(),
        offer_id: chat.offer_id().into_inner(),
        active: chat.is_active(),
        created_at: chat.created_at(),
        updated_at: chat.updated_at(),
    }
}

fn message_to_row(message: &ChatMessage) -> MessageRow {
    MessageRow {
        id: message.id().into_inner(),
        chat_id: message.chat_id().into_inner(),
        sender_id: message.sender_id().into_inner(),
        body: message.body().to_owned(),
        kind: message.kind().as_str().to_owned(),
        is_read: message.is_read(),
        created_at: message.created_at(),
    }
}

/// Reconstructs a chat from a stored row.
pub(crate) fn row_to_chat(row: ChatRow) -> Chat {
    Chat::from_persisted(PersistedChatData {
        id: ChatId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        customer_id: ProfileId::from_uuid(row.customer_id),
        provider_id: ProfileId::from_uuid(row.provider_id),
        offer_id: OfferId::from_uuid(row.offer_id),
        active: row.active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Error raised when a stored message has an unknown kind.
#[derive(Debug, thiserror::Error)]
#[error("corrupt message row {id}: unknown kind '{kind}'")]
pub(crate) struct CorruptMessageRow {
    id: uuid::Uuid,
    kind: String,
}

/// Reconstructs a message from a stored row.
pub(crate) fn row_to_message(row: MessageRow) -> Result<ChatMessage, CorruptMessageRow> {
    let Ok(kind) = MessageKind::try_from(row.kind.as_str()) else {
        return Err(CorruptMessageRow {
            id: row.id,
            kind: row.kind,
        });
    };
    Ok(ChatMessage::from_persisted(PersistedMessageData {
        id: MessageId::from_uuid(row.id),
        chat_id: ChatId::from_uuid(row.chat_id),
        sender_id: ProfileId::from_uuid(row.sender_id),
        body: row.body,
        kind,
        is_read: row.is_read,
        created_at: row.created_at,
    }))
}
