//! Message DTOs - Data Transfer Objects for the mail endpoints

use crate::entities::{Message, RecipientType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/messages`
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageDTO {
    #[validate(length(min = 1, max = 255, message = "Subject must be between 1 and 255 characters"))]
    #[serde(default)]
    pub subject: String,

    #[validate(length(min = 1, max = 5000, message = "Message content must be between 1 and 5000 characters"))]
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub recipient_type: RecipientType,
    #[serde(default)]
    pub recipient_id: Option<String>,
    #[serde(default)]
    pub parent_message_id: Option<i32>,
}

/// DTO per creare un nuovo messaggio (senza message_id)
#[derive(Debug, Clone)]
pub struct CreateMessageDTO {
    pub sender_id: String,
    pub recipient_id: Option<String>,
    pub recipient_type: RecipientType,
    pub subject: String,
    pub content: String,
    pub parent_message_id: Option<i32>,
    pub sent_at: DateTime<Utc>,
}

impl CreateMessageDTO {
    /// Materializes the row the store would hand back for this insert.
    pub fn into_message(self, message_id: i32) -> Message {
        Message {
            message_id,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            recipient_type: self.recipient_type,
            subject: self.subject,
            content: self.content,
            parent_message_id: self.parent_message_id,
            sent_at: self.sent_at,
            is_read: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponseDTO {
    pub success: bool,
    pub message_id: i32,
}

/// Inbox row: a root message received by the viewer
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InboxItemDTO {
    pub id: i32,
    pub sender_id: String,
    pub sender_name: String,
    pub subject: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
    pub recipient_type: RecipientType,
    pub reply_count: i64,
}

/// Sent row: a root message written by the viewer
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SentItemDTO {
    pub id: i32,
    pub recipient_id: Option<String>,
    pub recipient_name: String,
    pub subject: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub recipient_type: RecipientType,
    pub reply_count: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReplyDTO {
    pub id: i32,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

/// A root message plus its replies, oldest reply first
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThreadDTO {
    pub id: i32,
    pub sender_id: String,
    pub sender_name: String,
    pub recipient_id: Option<String>,
    pub recipient_name: String,
    pub subject: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
    pub recipient_type: RecipientType,
    pub replies: Vec<ReplyDTO>,
}
