//! In-memory adapters for the chat fabric.

mod chat;

pub(crate) use chat::deactivate_siblings;
pub use chat::InMemoryChatRepository;
