//! Application services for chats and messages.

mod chat;

pub use chat::{
    ChatOverview, ChatService, ChatServiceError, ChatServiceResult, OpenChatRequest,
    PostMessageRequest,
};
