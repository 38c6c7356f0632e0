//! Domain model for chats and their messages.

mod chat;
mod error;
mod ids;
mod message;
mod templates;

pub use chat::{Chat, PersistedChatData};
pub use error::{ChatDomainError, ParseMessageKindError};
pub use ids::{ChatId, MessageId};
pub use message::{ChatMessage, MessageKind, PersistedMessageData};
pub use templates::{render_match_announcement, render_offer_interest};
