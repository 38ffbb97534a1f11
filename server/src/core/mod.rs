//! Core Module - Infrastructure components of the server
//!
//! - Authentication (JWT verification, `Caller`)
//! - Configuration
//! - Error handling
//! - Application state

pub mod auth;
pub mod config;
pub mod error;
pub mod state;

// Re-exports per facilitare l'import
pub use auth::{Caller, Claims, JwtSettings, authentication_middleware, decode_jwt};
pub use config::Config;
pub use error::{AppError, MailError};
pub use state::AppState;
