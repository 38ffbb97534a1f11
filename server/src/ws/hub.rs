//! Notification Hub - pushes `MessageSent` events to connected users

use super::BROADCAST_CHANNEL_CAPACITY;
use super::usermap::{InternalSignal, UserMap};
use crate::dtos::{MessageSentEvent, WsEventDTO};
use crate::mail::EventPublisher;
use std::sync::Arc;
use tokio::sync::broadcast::{self, Receiver, Sender};
use tracing::{debug, info, instrument};

pub struct NotificationHub {
    users_online: UserMap,
    // Arc to share the event, not copy it, on each receiver
    everyone: Sender<Arc<WsEventDTO>>,
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationHub {
    pub fn new() -> Self {
        let (everyone, _) = broadcast::channel(BROADCAST_CHANNEL_CAPACITY);
        Self {
            users_online: UserMap::new(),
            everyone,
        }
    }

    pub fn users_online(&self) -> &UserMap {
        &self.users_online
    }

    /// Receiver for broadcast ("to all") events
    pub fn subscribe_broadcasts(&self) -> Receiver<Arc<WsEventDTO>> {
        self.everyone.subscribe()
    }
}

impl EventPublisher for NotificationHub {
    #[instrument(skip(self, event), fields(message_id = event.id))]
    fn publish(&self, event: MessageSentEvent) {
        let recipient_id = event.recipient_id.clone();
        let broadcast = event.is_broadcast();
        let frame = Arc::new(WsEventDTO::MessageSent(event));

        if broadcast {
            match self.everyone.send(frame) {
                Ok(n) => info!(receivers = n, "Broadcast pushed to online users"),
                Err(_) => debug!("No connection listening for broadcasts"),
            }
        } else if let Some(recipient_id) = recipient_id {
            self.users_online
                .send_if_online(&recipient_id, InternalSignal::Event(frame));
        }
    }
}
