//! User DTOs - Data Transfer Objects for the recipient directory

use crate::entities::User;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecipientDTO {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<User> for RecipientDTO {
    fn from(value: User) -> Self {
        Self {
            name: value.display_name(),
            id: value.user_id,
            email: value.email,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RecipientDirectoryDTO {
    pub parents: Vec<RecipientDTO>,
    pub teachers: Vec<RecipientDTO>,
}
