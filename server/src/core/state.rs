//! Application State - Shared state of the HTTP server
//!
//! Holds the mail core, the directory used by the authentication middleware,
//! the JWT settings and the notification hub.

use crate::core::auth::JwtSettings;
use crate::mail::Mailbox;
use crate::repositories::{MessageRepository, MessageStore, UserDirectory, UserRepository};
use crate::ws::hub::NotificationHub;
use sqlx::MySqlPool;
use std::sync::Arc;

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    /// Mail core operations
    pub mailbox: Mailbox,

    /// Identity provider directory, also used to authenticate callers
    pub directory: Arc<dyn UserDirectory>,

    /// Parametri per la verifica dei token JWT
    pub jwt: JwtSettings,

    /// Online users and the broadcast channel for "to all" messages
    pub hub: Arc<NotificationHub>,
}

impl AppState {
    /// Builds the state on top of any store/directory pair
    ///
    /// # Arguments
    /// * `store` - Message table
    /// * `directory` - User directory of the identity provider
    /// * `jwt` - Token verification settings
    pub fn new(
        store: Arc<dyn MessageStore>,
        directory: Arc<dyn UserDirectory>,
        jwt: JwtSettings,
    ) -> Self {
        let hub = Arc::new(NotificationHub::new());
        Self {
            mailbox: Mailbox::new(store, directory.clone(), hub.clone()),
            directory,
            jwt,
            hub,
        }
    }

    /// Crea una nuova istanza di AppState con i repository MySQL
    ///
    /// # Arguments
    /// * `pool` - Pool di connessioni MySQL condiviso
    /// * `jwt` - Token verification settings
    pub fn with_mysql(pool: MySqlPool, jwt: JwtSettings) -> Self {
        Self::new(
            Arc::new(MessageRepository::new(pool.clone())),
            Arc::new(UserRepository::new(pool)),
            jwt,
        )
    }
}
