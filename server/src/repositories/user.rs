//! UserRepository - Read access to the identity provider's directory tables

use super::traits::UserDirectory;
use crate::entities::{Role, User};
use async_trait::async_trait;
use sqlx::{Error, MySql, MySqlPool, QueryBuilder};

// USER REPO
pub struct UserRepository {
    connection_pool: MySqlPool,
}

impl UserRepository {
    pub fn new(connection_pool: MySqlPool) -> UserRepository {
        Self { connection_pool }
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find(&self, user_id: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, first_name, last_name, email FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.connection_pool)
        .await
    }

    async fn find_many(&self, user_ids: &[String]) -> Result<Vec<User>, Error> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<MySql>::new(
            "SELECT user_id, first_name, last_name, email FROM users WHERE user_id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in user_ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        builder
            .build_query_as::<User>()
            .fetch_all(&self.connection_pool)
            .await
    }

    async fn users_in_role(&self, role: Role) -> Result<Vec<User>, Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.user_id, u.first_name, u.last_name, u.email
            FROM users u
            JOIN user_roles ur ON ur.user_id = u.user_id
            WHERE ur.role = ?
            ORDER BY u.user_id ASC
            "#,
        )
        .bind(role)
        .fetch_all(&self.connection_pool)
        .await
    }
}
