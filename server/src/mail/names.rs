//! Display-name resolution against the user directory

use crate::entities::{ALL_USERS_LABEL, UNKNOWN_USER_LABEL};
use crate::repositories::UserDirectory;
use std::collections::HashMap;
use tracing::warn;

/// Display names for a batch of user ids, fetched with a single directory call.
pub struct DisplayNames {
    names: HashMap<String, String>,
}

impl DisplayNames {
    pub async fn load<'a, I>(directory: &dyn UserDirectory, ids: I) -> Result<Self, sqlx::Error>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut wanted: Vec<String> = ids.into_iter().map(str::to_string).collect();
        wanted.sort();
        wanted.dedup();

        let names = directory
            .find_many(&wanted)
            .await?
            .into_iter()
            .map(|user| (user.user_id.clone(), user.display_name()))
            .collect();
        Ok(Self { names })
    }

    pub fn user(&self, user_id: &str) -> String {
        match self.names.get(user_id) {
            Some(name) => name.clone(),
            None => {
                warn!(user_id, "User id not found in directory");
                UNKNOWN_USER_LABEL.to_string()
            }
        }
    }

    /// Recipient label: the user's name, or "All Users" for a broadcast
    pub fn recipient(&self, recipient_id: Option<&str>) -> String {
        match recipient_id {
            Some(id) => self.user(id),
            None => ALL_USERS_LABEL.to_string(),
        }
    }
}
