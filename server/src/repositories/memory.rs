//! In-memory repositories
//!
//! Same contracts as the MySQL repositories, used by the test-suite and for
//! running the server without a database.

use super::traits::{MessageStore, RootFilter, UserDirectory};
use crate::dtos::CreateMessageDTO;
use crate::entities::{Message, Role, RootRecord, User};
use async_trait::async_trait;
use dashmap::DashMap;
use std::cmp::Reverse;
use tokio::sync::RwLock;
use tracing::debug;

/// Message table kept in insertion order: `message_id == index + 1`.
#[derive(Default)]
pub struct InMemoryMessageStore {
    rows: RwLock<Vec<Message>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn index_of(id: i32) -> Option<usize> {
        usize::try_from(id).ok()?.checked_sub(1)
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert(&self, data: &CreateMessageDTO) -> Result<Message, sqlx::Error> {
        let mut rows = self.rows.write().await;
        let new_id = i32::try_from(rows.len() + 1)
            .map_err(|e| sqlx::Error::Protocol(format!("message id overflow: {e}")))?;
        let message = data.clone().into_message(new_id);
        rows.push(message.clone());
        debug!(message_id = new_id, "Message stored in memory");
        Ok(message)
    }

    async fn get(&self, id: i32) -> Result<Option<Message>, sqlx::Error> {
        let rows = self.rows.read().await;
        Ok(Self::index_of(id).and_then(|i| rows.get(i)).cloned())
    }

    async fn list_roots(&self, filter: &RootFilter) -> Result<Vec<RootRecord>, sqlx::Error> {
        let rows = self.rows.read().await;
        let mut roots: Vec<RootRecord> = rows
            .iter()
            .filter(|m| filter.matches(m))
            .map(|m| RootRecord {
                message: m.clone(),
                reply_count: rows
                    .iter()
                    .filter(|r| r.parent_message_id == Some(m.message_id))
                    .count() as i64,
            })
            .collect();
        roots.sort_by_key(|r| Reverse((r.message.sent_at, r.message.message_id)));
        Ok(roots)
    }

    async fn list_replies(&self, root_id: i32) -> Result<Vec<Message>, sqlx::Error> {
        let rows = self.rows.read().await;
        let mut replies: Vec<Message> = rows
            .iter()
            .filter(|m| m.parent_message_id == Some(root_id))
            .cloned()
            .collect();
        replies.sort_by_key(|m| (m.sent_at, m.message_id));
        Ok(replies)
    }

    async fn mark_read_if_recipient(&self, id: i32, viewer_id: &str) -> Result<bool, sqlx::Error> {
        // check and set under the same write guard
        let mut rows = self.rows.write().await;
        let Some(message) = Self::index_of(id).and_then(|i| rows.get_mut(i)) else {
            return Ok(false);
        };
        if message.is_broadcast()
            || message.is_read
            || message.recipient_id.as_deref() != Some(viewer_id)
        {
            return Ok(false);
        }
        message.is_read = true;
        Ok(true)
    }
}

/// Directory populated by hand, keyed by user id.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: DashMap<String, (User, Vec<Role>)>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a user together with its roles
    pub fn register(&self, user: User, roles: Vec<Role>) {
        self.users.insert(user.user_id.clone(), (user, roles));
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find(&self, user_id: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self.users.get(user_id).map(|entry| entry.value().0.clone()))
    }

    async fn find_many(&self, user_ids: &[String]) -> Result<Vec<User>, sqlx::Error> {
        Ok(user_ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|entry| entry.value().0.clone()))
            .collect())
    }

    async fn users_in_role(&self, role: Role) -> Result<Vec<User>, sqlx::Error> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|entry| entry.value().1.contains(&role))
            .map(|entry| entry.value().0.clone())
            .collect();
        users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(users)
    }
}
