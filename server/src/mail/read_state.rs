//! Read-State Tracker - unread to read, once, on first view by the recipient

use crate::entities::Message;
use crate::repositories::MessageStore;
use tracing::{debug, info, instrument};

/// Marks `message` read when `viewer_id` is its individual recipient and it is
/// still unread. Returns true only for the call that performed the transition;
/// a concurrent loser sees false. Broadcasts are never marked.
#[instrument(skip(store, message), fields(message_id = message.message_id))]
pub async fn mark_read_if_recipient(
    store: &dyn MessageStore,
    message: &Message,
    viewer_id: &str,
) -> Result<bool, sqlx::Error> {
    if message.is_broadcast()
        || message.is_read
        || message.recipient_id.as_deref() != Some(viewer_id)
    {
        debug!("Nothing to mark");
        return Ok(false);
    }

    let transitioned = store
        .mark_read_if_recipient(message.message_id, viewer_id)
        .await?;
    if transitioned {
        info!("Message marked as read");
    } else {
        debug!("Message already marked by a concurrent view");
    }
    Ok(transitioned)
}
