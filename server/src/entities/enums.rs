//! Enumerazioni - Enumerated types shared by the entities

use serde::{Deserialize, Serialize};

// ********************* ENUMERAZIONI UTILI **********************//

/// Addressing mode of a message: a single user or every user.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "recipient_type", rename_all = "UPPERCASE")]
pub enum RecipientType {
    #[default]
    Individual,
    All,
}

/// Roles issued by the identity provider.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Teacher,
    Parent,
}
