//! WebSocket Event DTOs - Events pushed through the notification hub

use crate::entities::{Message, RecipientType};
use serde::{Deserialize, Serialize};

/// Emitted once per successful send.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageSentEvent {
    pub id: i32,
    pub sender_id: String,
    // None for broadcasts
    pub recipient_id: Option<String>,
    pub recipient_type: RecipientType,
    pub subject: String,
}

impl MessageSentEvent {
    pub fn is_broadcast(&self) -> bool {
        self.recipient_type == RecipientType::All
    }
}

impl From<&Message> for MessageSentEvent {
    fn from(value: &Message) -> Self {
        Self {
            id: value.message_id,
            sender_id: value.sender_id.clone(),
            recipient_id: value.recipient_id.clone(),
            recipient_type: value.recipient_type,
            subject: value.subject.clone(),
        }
    }
}

/// Tagged union per eventi WebSocket
/// Serde serializza questo come:
/// { "type": "MessageSent", "data": { ... } }
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", content = "data")]
pub enum WsEventDTO {
    MessageSent(MessageSentEvent),
    Error { code: u16, message: String },
}
