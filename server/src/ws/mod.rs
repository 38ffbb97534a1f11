//! WebSocket Module - Real-time notification hub
//!
//! Authenticated clients open `/ws` and receive a JSON frame for every
//! message addressed to them and for every broadcast:
//! - `hub`: `EventPublisher` implementation fed by the mail core
//! - `usermap`: online users and their writer channels
//! - `connection`: per-connection reader/writer tasks

pub mod connection;
pub mod hub;
pub mod usermap;

pub use connection::handle_socket;
pub use hub::NotificationHub;

use crate::core::{AppState, Caller};
use axum::{
    Extension,
    extract::{State, ws::WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;

pub const BROADCAST_CHANNEL_CAPACITY: usize = 256;
pub const RATE_LIMITER_MILLIS: u64 = 50;
pub const TIMEOUT_DURATION_SECONDS: u64 = 300;

/// Entry point per gestire richieste di upgrade WebSocket
/// The caller has already been authenticated by the middleware.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Response {
    let user_id = caller.user_id;
    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}
