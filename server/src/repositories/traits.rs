//! Common repository traits
//!
//! This module defines the storage seams of the mail service. Both traits are
//! object safe so the application state can hold either the MySQL
//! repositories or the in-memory ones behind an `Arc<dyn _>`.

use crate::dtos::CreateMessageDTO;
use crate::entities::{Message, RecipientType, Role, RootRecord, User};
use async_trait::async_trait;

/// Which root messages a listing should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootFilter {
    /// Roots addressed to the viewer, plus every broadcast
    Inbox(String),
    /// Roots written by the viewer
    Sent(String),
}

impl RootFilter {
    /// Listing predicate. `MessageRepository` mirrors it in SQL, keep them in sync.
    pub fn matches(&self, message: &Message) -> bool {
        if !message.is_root() {
            return false;
        }
        match self {
            RootFilter::Inbox(viewer) => {
                message.recipient_id.as_deref() == Some(viewer.as_str())
                    || message.recipient_type == RecipientType::All
            }
            RootFilter::Sent(viewer) => message.sender_id == *viewer,
        }
    }

    pub fn viewer(&self) -> &str {
        match self {
            RootFilter::Inbox(viewer) | RootFilter::Sent(viewer) => viewer,
        }
    }
}

/// Trait for the durable message table
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Inserts a new message
    ///
    /// # Arguments
    /// * `data` - DTO containing the data for creation (without ID)
    ///
    /// # Returns
    /// * `Ok(Message)` - Created message with the ID assigned by the store
    /// * `Err(sqlx::Error)` - Error during insertion
    async fn insert(&self, data: &CreateMessageDTO) -> Result<Message, sqlx::Error>;

    /// Reads a message by its primary key
    ///
    /// # Returns
    /// * `Ok(Some(Message))` - Message found
    /// * `Ok(None)` - No message with that ID
    async fn get(&self, id: i32) -> Result<Option<Message>, sqlx::Error>;

    /// Lists the root messages matching `filter`, newest first
    ///
    /// Ties on `sent_at` are broken by descending `message_id`, i.e. the most
    /// recently inserted row comes first.
    async fn list_roots(&self, filter: &RootFilter) -> Result<Vec<RootRecord>, sqlx::Error>;

    /// Lists the direct replies of `root_id`, oldest first (ties by ascending id)
    async fn list_replies(&self, root_id: i32) -> Result<Vec<Message>, sqlx::Error>;

    /// Atomically flips `is_read` to true when the message is unread and
    /// individually addressed to `viewer_id`
    ///
    /// # Returns
    /// * `Ok(true)` - This call performed the transition
    /// * `Ok(false)` - Nothing to do (already read, other recipient, broadcast, missing)
    async fn mark_read_if_recipient(&self, id: i32, viewer_id: &str) -> Result<bool, sqlx::Error>;
}

/// Trait for the identity provider's user directory (read only)
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Reads a single user by id
    async fn find(&self, user_id: &str) -> Result<Option<User>, sqlx::Error>;

    /// Reads multiple users by id
    ///
    /// # Note
    /// Users are returned in no particular order; unknown ids are skipped.
    async fn find_many(&self, user_ids: &[String]) -> Result<Vec<User>, sqlx::Error>;

    /// Lists the users holding `role`, ordered by id
    async fn users_in_role(&self, role: Role) -> Result<Vec<User>, sqlx::Error>;
}
