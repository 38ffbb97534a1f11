//! Entities module - Domain entities
//!
//! Every entity maps to a table in the database. `Message` is owned by this
//! service; `User` is a read-only view of the identity provider's directory.

pub mod enums;
pub mod message;
pub mod user;

// Re-exports per facilitare l'import
pub use enums::{RecipientType, Role};
pub use message::{Message, RootRecord};
pub use user::{ALL_USERS_LABEL, UNKNOWN_USER_LABEL, User};
