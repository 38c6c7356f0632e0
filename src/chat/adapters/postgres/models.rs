//! Diesel row models for chat persistence.

use crate::store::schema::{chat_messages, chats};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result and insert row for chats.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = chats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChatRow {
    /// Chat identifier.
    pub id: uuid::Uuid,
    /// Parent task.
    pub task_id: uuid::Uuid,
    /// Customer participant.
    pub customer_id: uuid::Uuid,
    /// Provider participant.
    pub provider_id: uuid::Uuid,
    /// Originating offer.
    pub offer_id: uuid::Uuid,
    /// Activity flag.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest activity timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result and insert row for chat messages.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Message identifier.
    pub id: uuid::Uuid,
    /// Parent chat.
    pub chat_id: uuid::Uuid,
    /// Sender.
    pub sender_id: uuid::Uuid,
    /// Message text.
    pub body: String,
    /// Message kind.
    pub kind: String,
    /// Read flag.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
