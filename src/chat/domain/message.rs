//! Chat messages and their kinds.

use super::{ChatDomainError, ChatId, MessageId, ParseMessageKindError};
use crate::profile::domain::ProfileId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    /// Free text typed by a participant.
    Text,
    /// Generated when an offer is placed.
    OfferUpdate,
    /// Generated by the marketplace itself.
    System,
}

impl MessageKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::OfferUpdate => "OFFER_UPDATE",
            Self::System => "SYSTEM",
        }
    }

    /// Returns `true` when the kind may only be posted to an active chat.
    #[must_use]
    pub const fn requires_active_chat(self) -> bool {
        matches!(self, Self::Text)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MessageKind {
    type Error = ParseMessageKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TEXT" => Ok(Self::Text),
            "OFFER_UPDATE" => Ok(Self::OfferUpdate),
            "SYSTEM" => Ok(Self::System),
            _ => Err(ParseMessageKindError(value.to_owned())),
        }
    }
}

/// A single message in a chat.
///
/// Messages are immutable after creation apart from the read flag, which
/// only ever moves from unread to read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: MessageId,
    chat_id: ChatId,
    sender_id: ProfileId,
    body: String,
    kind: MessageKind,
    is_read: bool,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMessageData {
    /// Persisted message identifier.
    pub id: MessageId,
    /// Persisted parent chat.
    pub chat_id: ChatId,
    /// Persisted sender.
    pub sender_id: ProfileId,
    /// Persisted body.
    pub body: String,
    /// Persisted kind.
    pub kind: MessageKind,
    /// Persisted read flag.
    pub is_read: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates an unread message.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::EmptyBody`] when `body` is blank.
    pub fn new(
        chat_id: ChatId,
        sender_id: ProfileId,
        body: impl Into<String>,
        kind: MessageKind,
        clock: &impl Clock,
    ) -> Result<Self, ChatDomainError> {
        Self::new_at(chat_id, sender_id, body, kind, clock.utc())
    }

    /// Creates an unread message stamped with `created_at`.
    ///
    /// Used when the timestamp must match other writes in the same unit.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::EmptyBody`] when `body` is blank.
    pub fn new_at(
        chat_id: ChatId,
        sender_id: ProfileId,
        body: impl Into<String>,
        kind: MessageKind,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ChatDomainError> {
        let text = body.into();
        if text.trim().is_empty() {
            return Err(ChatDomainError::EmptyBody);
        }
        Ok(Self {
            id: MessageId::new(),
            chat_id,
            sender_id,
            body: text,
            kind,
            is_read: false,
            created_at,
        })
    }

    /// Reconstructs a message from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedMessageData) -> Self {
        Self {
            id: data.id,
            chat_id: data.chat_id,
            sender_id: data.sender_id,
            body: data.body,
            kind: data.kind,
            is_read: data.is_read,
            created_at: data.created_at,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the parent chat.
    #[must_use]
    pub const fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    /// Returns the sender.
    #[must_use]
    pub const fn sender_id(&self) -> ProfileId {
        self.sender_id
    }

    /// Returns the message text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the message kind.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Returns whether the recipient has read the message.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` when `reader` has an unread copy of this message.
    #[must_use]
    pub fn is_unread_for(&self, reader: ProfileId) -> bool {
        !self.is_read && self.sender_id != reader
    }

    /// Flags the message as read.
    pub const fn mark_read(&mut self) {
        self.is_read = true;
    }
}
