//! MessageRepository - MySQL-backed message store

use super::traits::{MessageStore, RootFilter};
use crate::dtos::CreateMessageDTO;
use crate::entities::{Message, RootRecord};
use async_trait::async_trait;
use sqlx::{Error, MySqlPool};

const MESSAGE_COLUMNS: &str = r#"
    m.message_id,
    m.sender_id,
    m.recipient_id,
    m.recipient_type,
    m.subject,
    m.content,
    m.parent_message_id,
    m.sent_at,
    m.is_read
"#;

// MESSAGE REPO
pub struct MessageRepository {
    connection_pool: MySqlPool,
}

impl MessageRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }

    fn roots_query(filter: &RootFilter) -> String {
        // same predicate as RootFilter::matches
        let predicate = match filter {
            RootFilter::Inbox(_) => "(m.recipient_id = ? OR m.recipient_type = 'ALL')",
            RootFilter::Sent(_) => "m.sender_id = ?",
        };
        format!(
            r#"
            SELECT {MESSAGE_COLUMNS},
                (SELECT COUNT(*) FROM messages r WHERE r.parent_message_id = m.message_id) AS reply_count
            FROM messages m
            WHERE m.parent_message_id IS NULL
              AND {predicate}
            ORDER BY m.sent_at DESC, m.message_id DESC
            "#
        )
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn insert(&self, data: &CreateMessageDTO) -> Result<Message, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO messages
                (sender_id, recipient_id, recipient_type, subject, content, parent_message_id, sent_at, is_read)
            VALUES (?, ?, ?, ?, ?, ?, ?, FALSE)
            "#,
        )
        .bind(&data.sender_id)
        .bind(&data.recipient_id)
        .bind(data.recipient_type)
        .bind(&data.subject)
        .bind(&data.content)
        .bind(data.parent_message_id)
        .bind(data.sent_at)
        .execute(&self.connection_pool)
        .await?;

        // Get the last inserted ID
        let new_id = result.last_insert_id() as i32;

        Ok(data.clone().into_message(new_id))
    }

    async fn get(&self, id: i32) -> Result<Option<Message>, Error> {
        let query = format!("SELECT {MESSAGE_COLUMNS} FROM messages m WHERE m.message_id = ?");
        sqlx::query_as::<_, Message>(&query)
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }

    async fn list_roots(&self, filter: &RootFilter) -> Result<Vec<RootRecord>, Error> {
        let query = Self::roots_query(filter);
        sqlx::query_as::<_, RootRecord>(&query)
            .bind(filter.viewer())
            .fetch_all(&self.connection_pool)
            .await
    }

    async fn list_replies(&self, root_id: i32) -> Result<Vec<Message>, Error> {
        let query = format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM messages m
            WHERE m.parent_message_id = ?
            ORDER BY m.sent_at ASC, m.message_id ASC
            "#
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(root_id)
            .fetch_all(&self.connection_pool)
            .await
    }

    async fn mark_read_if_recipient(&self, id: i32, viewer_id: &str) -> Result<bool, Error> {
        // single conditional update, the row lock makes check-and-set atomic
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET is_read = TRUE
            WHERE message_id = ?
              AND recipient_type = 'INDIVIDUAL'
              AND recipient_id = ?
              AND is_read = FALSE
            "#,
        )
        .bind(id)
        .bind(viewer_id)
        .execute(&self.connection_pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
