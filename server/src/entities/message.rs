//! Message entity - The only record owned by the mail service

use super::enums::RecipientType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Message {
    pub message_id: i32,
    pub sender_id: String,
    // None iff recipient_type == All
    pub recipient_id: Option<String>,
    pub recipient_type: RecipientType,
    pub subject: String,
    pub content: String,
    // set on replies only, always pointing at a root
    pub parent_message_id: Option<i32>,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

impl Message {
    pub fn is_root(&self) -> bool {
        self.parent_message_id.is_none()
    }

    pub fn is_broadcast(&self) -> bool {
        self.recipient_type == RecipientType::All
    }
}

/// A root message together with the number of replies pointing at it.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RootRecord {
    #[sqlx(flatten)]
    pub message: Message,
    pub reply_count: i64,
}
