//! Services module - HTTP handlers
//!
//! Handlers stay thin: extract the caller and the input, call the mail core,
//! map errors through `AppError`.

pub mod messages;

// Re-exports per facilitare l'import
pub use messages::{get_inbox, get_message, get_recipients, get_sent, send_message};

use axum::{http::StatusCode, response::IntoResponse};

/// Root endpoint - health check
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
