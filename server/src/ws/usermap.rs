use crate::dtos::WsEventDTO;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, instrument, warn};

pub enum InternalSignal {
    Shutdown,
    Event(Arc<WsEventDTO>),
}

impl InternalSignal {
    fn name(&self) -> &'static str {
        match self {
            InternalSignal::Shutdown => "Shutdown",
            InternalSignal::Event(_) => "Event",
        }
    }
}

/// Online users and the channel feeding their WebSocket writer task.
/// One connection per user: a new one replaces the previous.
#[derive(Default)]
pub struct UserMap {
    users_online: DashMap<String, UnboundedSender<InternalSignal>>,
}

impl UserMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(skip(self, tx))]
    pub fn register_online(&self, user_id: String, tx: UnboundedSender<InternalSignal>) {
        info!("Registering user as online");
        // the old listener still holds a sender, so the writer must be told
        if let Some(previous) = self.users_online.insert(user_id, tx) {
            let _ = previous.send(InternalSignal::Shutdown);
            info!("Previous connection replaced");
        }
        info!("Total online users: {}", self.users_online.len());
    }

    /// Removes the entry only if it still belongs to the connection owning `tx`
    #[instrument(skip(self, tx))]
    pub fn remove_from_online(&self, user_id: &str, tx: &UnboundedSender<InternalSignal>) {
        match self
            .users_online
            .remove_if(user_id, |_, current| current.same_channel(tx))
        {
            Some(_) => info!("Removing user from online"),
            None => info!("Connection already replaced, keeping the newer one"),
        }
    }

    #[instrument(skip(self, message))]
    pub fn send_if_online(&self, user_id: &str, message: InternalSignal) {
        let message_type = message.name();
        if let Some(entry) = self.users_online.get(user_id) {
            if entry.value().send(message).is_err() {
                warn!("Failed to send {} message to user, writer task gone", message_type);
            } else {
                info!("{} message sent to online user", message_type);
            }
        } else {
            info!("User not online, {} message not sent", message_type);
        }
    }

    /// Get the count of online users
    pub fn online_count(&self) -> usize {
        self.users_online.len()
    }

    /// Check if a specific user is online
    pub fn is_user_online(&self, user_id: &str) -> bool {
        self.users_online.contains_key(user_id)
    }
}
