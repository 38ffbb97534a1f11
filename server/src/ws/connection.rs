//! WebSocket Connection Management - reader and writer task per connection

use crate::core::AppState;
use crate::dtos::WsEventDTO;
use crate::ws::usermap::InternalSignal;
use crate::ws::{RATE_LIMITER_MILLIS, TIMEOUT_DURATION_SECONDS};
use axum::extract::ws::Utf8Bytes;
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::Duration;
use tokio::time::{interval, timeout};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{debug, error, info, instrument, warn};

const PUSH_ONLY_MESSAGE: &str = "This channel does not accept client messages";

#[instrument(skip(ws, state))]
pub async fn handle_socket(ws: WebSocket, state: Arc<AppState>, user_id: String) {
    info!("WebSocket connection established");

    // Dividiamo il WebSocket in due metà: sender e receiver
    let (ws_tx, ws_rx) = ws.split();

    // Canale interno verso il task di scrittura
    let (int_tx, int_rx) = unbounded_channel::<InternalSignal>();

    // subscribe before going online, so an online user never misses a broadcast
    let broadcasts = BroadcastStream::new(state.hub.subscribe_broadcasts());
    state
        .hub
        .users_online()
        .register_online(user_id.clone(), int_tx.clone());

    tokio::spawn(listen_ws(user_id.clone(), ws_rx, int_tx, state));
    tokio::spawn(write_ws(user_id, ws_tx, int_rx, broadcasts));
}

#[instrument(skip(websocket_tx, internal_rx, broadcasts))]
pub async fn write_ws(
    user_id: String,
    mut websocket_tx: SplitSink<WebSocket, Message>,
    mut internal_rx: UnboundedReceiver<InternalSignal>,
    mut broadcasts: BroadcastStream<Arc<WsEventDTO>>,
) {
    info!("Write task started");

    'external: loop {
        tokio::select! {
            signal = internal_rx.recv() => {
                match signal {
                    Some(InternalSignal::Event(event)) => {
                        if send_event(&mut websocket_tx, &event).await.is_err() {
                            warn!("Failed to push event, closing connection");
                            break 'external;
                        }
                    }
                    Some(InternalSignal::Shutdown) => {
                        info!("Shutdown signal received");
                        break 'external;
                    }
                    None => {
                        // sender dropped: listener gone or connection replaced
                        info!("Internal channel closed");
                        break 'external;
                    }
                }
            }

            Some(result) = tokio_stream::StreamExt::next(&mut broadcasts) => {
                match result {
                    Ok(event) => {
                        if send_event(&mut websocket_tx, &event).await.is_err() {
                            warn!("Failed to push broadcast, closing connection");
                            break 'external;
                        }
                    }
                    Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                        warn!(skipped, "Slow connection, broadcasts dropped");
                    }
                }
            }
        }
    }

    let _ = websocket_tx.close().await;
    info!("Write task terminated");
}

async fn send_event(
    websocket_tx: &mut SplitSink<WebSocket, Message>,
    event: &WsEventDTO,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event).map_err(|e| {
        error!("Failed to serialize event: {:?}", e);
        axum::Error::new(e)
    })?;
    websocket_tx
        .send(Message::Text(Utf8Bytes::from(json)))
        .await
        .map_err(|e| {
            error!("Failed to send event through WebSocket: {:?}", e);
            e
        })
}

#[instrument(skip(websocket_rx, internal_tx, state))]
pub async fn listen_ws(
    user_id: String,
    mut websocket_rx: SplitStream<WebSocket>,
    internal_tx: UnboundedSender<InternalSignal>,
    state: Arc<AppState>,
) {
    info!("Listen task started");

    let mut rate_limiter = interval(Duration::from_millis(RATE_LIMITER_MILLIS));
    let timeout_duration = Duration::from_secs(TIMEOUT_DURATION_SECONDS);

    loop {
        match timeout(timeout_duration, StreamExt::next(&mut websocket_rx)).await {
            Ok(Some(msg_result)) => {
                rate_limiter.tick().await;

                match msg_result {
                    Ok(Message::Close(_)) => {
                        info!("Close message received");
                        break;
                    }
                    // push-only hub
                    Ok(Message::Text(_)) | Ok(Message::Binary(_)) => {
                        debug!("Rejecting client frame");
                        let _ = internal_tx.send(InternalSignal::Event(Arc::new(
                            WsEventDTO::Error {
                                code: 400,
                                message: PUSH_ONLY_MESSAGE.to_string(),
                            },
                        )));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("WebSocket error: {:?}", e);
                        break;
                    }
                }
            }
            Ok(None) => {
                info!("WebSocket stream ended");
                break;
            }
            Err(_) => {
                warn!(
                    timeout_secs = TIMEOUT_DURATION_SECONDS,
                    "Connection timeout"
                );
                break;
            }
        }
    }

    // Cleanup
    info!("Cleaning up connection");
    let _ = internal_tx.send(InternalSignal::Shutdown);
    state
        .hub
        .users_online()
        .remove_from_online(&user_id, &internal_tx);
    info!("Listen task terminated");
}
