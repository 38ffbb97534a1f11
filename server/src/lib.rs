//! Daycare mail server - library entry point, used by main and the tests

pub mod core;
pub mod dtos;
pub mod entities;
pub mod mail;
pub mod repositories;
pub mod services;
pub mod ws;

// Re-export dei tipi principali per facilitare l'import
pub use core::{AppError, AppState, Caller, MailError, auth, config};
pub use mail::Mailbox;
pub use services::root;

use axum::{
    Router, middleware,
    routing::{any, get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    use core::authentication_middleware;
    use ws::ws_handler;

    Router::new()
        .route("/", get(root))
        .nest("/api/messages", configure_message_routes(state.clone()))
        .route(
            "/ws",
            any(ws_handler).layer(middleware::from_fn_with_state(
                state.clone(),
                authentication_middleware,
            )),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Configura le routes della posta interna
fn configure_message_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/", post(send_message))
        .route("/inbox", get(get_inbox))
        .route("/sent", get(get_sent))
        .route("/recipients", get(get_recipients))
        .route("/{message_id}", get(get_message))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}
