//! DTOs module - Data Transfer Objects
//!
//! DTOs separate the external (API) representation from the entities.

pub mod message;
pub mod user;
pub mod ws_event;

// Re-exports
pub use message::{
    CreateMessageDTO, InboxItemDTO, ReplyDTO, SendMessageDTO, SendMessageResponseDTO,
    SentItemDTO, ThreadDTO,
};
pub use user::{RecipientDTO, RecipientDirectoryDTO};
pub use ws_event::{MessageSentEvent, WsEventDTO};
