//! Inbox/Sent Projector - the two top-level listings

use super::names::DisplayNames;
use crate::core::MailError;
use crate::dtos::{InboxItemDTO, SentItemDTO};
use crate::repositories::{MessageStore, RootFilter, UserDirectory};
use tracing::{info, instrument};

/// Roots addressed to the viewer plus broadcasts, newest first. Read only.
#[instrument(skip(store, directory))]
pub async fn list_inbox(
    store: &dyn MessageStore,
    directory: &dyn UserDirectory,
    viewer_id: &str,
) -> Result<Vec<InboxItemDTO>, MailError> {
    let roots = store
        .list_roots(&RootFilter::Inbox(viewer_id.to_string()))
        .await?;
    let names =
        DisplayNames::load(directory, roots.iter().map(|r| r.message.sender_id.as_str())).await?;

    let items: Vec<InboxItemDTO> = roots
        .into_iter()
        .map(|root| {
            let m = root.message;
            InboxItemDTO {
                sender_name: names.user(&m.sender_id),
                id: m.message_id,
                sender_id: m.sender_id,
                subject: m.subject,
                content: m.content,
                sent_at: m.sent_at,
                is_read: m.is_read,
                recipient_type: m.recipient_type,
                reply_count: root.reply_count,
            }
        })
        .collect();

    info!(count = items.len(), "Inbox listed");
    Ok(items)
}

/// Roots written by the viewer, newest first. Read only.
#[instrument(skip(store, directory))]
pub async fn list_sent(
    store: &dyn MessageStore,
    directory: &dyn UserDirectory,
    viewer_id: &str,
) -> Result<Vec<SentItemDTO>, MailError> {
    let roots = store
        .list_roots(&RootFilter::Sent(viewer_id.to_string()))
        .await?;
    let names = DisplayNames::load(
        directory,
        roots.iter().filter_map(|r| r.message.recipient_id.as_deref()),
    )
    .await?;

    let items: Vec<SentItemDTO> = roots
        .into_iter()
        .map(|root| {
            let m = root.message;
            SentItemDTO {
                recipient_name: names.recipient(m.recipient_id.as_deref()),
                id: m.message_id,
                recipient_id: m.recipient_id,
                subject: m.subject,
                content: m.content,
                sent_at: m.sent_at,
                recipient_type: m.recipient_type,
                reply_count: root.reply_count,
            }
        })
        .collect();

    info!(count = items.len(), "Sent messages listed");
    Ok(items)
}
