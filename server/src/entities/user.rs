//! User entity - Read model of the identity provider's user directory

use serde::{Deserialize, Serialize};

/// Label used wherever a broadcast recipient has to be displayed.
pub const ALL_USERS_LABEL: &str = "All Users";

/// Label used when an id cannot be resolved in the directory.
pub const UNKNOWN_USER_LABEL: &str = "Unknown User";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
