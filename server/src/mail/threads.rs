//! Thread Assembler - a root message with its replies

use super::names::DisplayNames;
use super::read_state::mark_read_if_recipient;
use crate::core::MailError;
use crate::dtos::{ReplyDTO, ThreadDTO};
use crate::repositories::{MessageStore, UserDirectory};
use futures::future::try_join;
use tracing::{debug, info, instrument};

/// Loads message `root_id` with its direct replies (oldest first) and marks it
/// read when `viewer_id` is its recipient. Participation is not checked here.
#[instrument(skip(store, directory))]
pub async fn get_thread(
    store: &dyn MessageStore,
    directory: &dyn UserDirectory,
    root_id: i32,
    viewer_id: &str,
) -> Result<ThreadDTO, MailError> {
    let (root, replies) = try_join(store.get(root_id), store.list_replies(root_id)).await?;
    let mut root = root.ok_or(MailError::NotFound)?;
    debug!(reply_count = replies.len(), "Thread loaded");

    if root.recipient_id.as_deref() == Some(viewer_id) && !root.is_read {
        mark_read_if_recipient(store, &root, viewer_id).await?;
        // either we flipped it or a concurrent view did
        root.is_read = true;
    }

    let ids = std::iter::once(root.sender_id.as_str())
        .chain(root.recipient_id.as_deref())
        .chain(replies.iter().map(|r| r.sender_id.as_str()));
    let names = DisplayNames::load(directory, ids).await?;

    let replies = replies
        .into_iter()
        .map(|reply| ReplyDTO {
            sender_name: names.user(&reply.sender_id),
            id: reply.message_id,
            sender_id: reply.sender_id,
            content: reply.content,
            sent_at: reply.sent_at,
        })
        .collect();

    info!("Thread assembled");
    Ok(ThreadDTO {
        id: root.message_id,
        sender_name: names.user(&root.sender_id),
        recipient_name: names.recipient(root.recipient_id.as_deref()),
        sender_id: root.sender_id,
        recipient_id: root.recipient_id,
        subject: root.subject,
        content: root.content,
        sent_at: root.sent_at,
        is_read: root.is_read,
        recipient_type: root.recipient_type,
        replies,
    })
}
