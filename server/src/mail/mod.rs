//! Mail core - role-aware messaging between parents, teachers and admins
//!
//! `Mailbox` wires the store, the user directory and the event publisher
//! together and exposes the five operations of the service. Every operation
//! takes an explicit `Caller`; nothing is read from ambient state.
//!
//! - `routing`: who a new message may be addressed to
//! - `threads`: root + replies view, with the implicit mark-as-read
//! - `projector`: inbox and sent listings
//! - `read_state`: the single unread -> read transition
//! - `recipients`: admin-only directory of parents and teachers

pub mod names;
pub mod projector;
pub mod read_state;
pub mod recipients;
pub mod routing;
pub mod threads;

pub use routing::{Recipient, Rejection, RoutingDecision, resolve_recipient};

use crate::core::{Caller, MailError};
use crate::dtos::{
    CreateMessageDTO, InboxItemDTO, MessageSentEvent, RecipientDirectoryDTO, SendMessageDTO,
    SentItemDTO, ThreadDTO,
};
use crate::entities::{RecipientType, Role};
use crate::repositories::{MessageStore, UserDirectory};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Consumer of `MessageSent` events (the real-time notification hub).
/// Called once per successful send; must not block.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: MessageSentEvent);
}

/// Publisher that drops every event
pub struct NoopPublisher;

impl EventPublisher for NoopPublisher {
    fn publish(&self, _event: MessageSentEvent) {}
}

#[derive(Clone)]
pub struct Mailbox {
    store: Arc<dyn MessageStore>,
    directory: Arc<dyn UserDirectory>,
    events: Arc<dyn EventPublisher>,
}

impl Mailbox {
    pub fn new(
        store: Arc<dyn MessageStore>,
        directory: Arc<dyn UserDirectory>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            store,
            directory,
            events,
        }
    }

    pub fn store(&self) -> &dyn MessageStore {
        self.store.as_ref()
    }

    pub fn directory(&self) -> &dyn UserDirectory {
        self.directory.as_ref()
    }

    /// Validates, routes and stores a new message, then emits `MessageSent`.
    /// Returns the new message id.
    #[instrument(skip(self, caller, request), fields(user_id = %caller.user_id, recipient_type = ?request.recipient_type))]
    pub async fn send(&self, caller: &Caller, request: SendMessageDTO) -> Result<i32, MailError> {
        debug!("Sending message");
        // 1. Subject e content obbligatori, poi i limiti di lunghezza
        if request.subject.is_empty() || request.content.is_empty() {
            warn!("Message without subject or content");
            return Err(MailError::BadRequest("Subject and Content are required"));
        }
        request.validate()?;

        // 2. Routing: the admin set is only needed for non-admin senders
        let sender_is_admin = caller.is_admin();
        let admins = if routing::needs_admin_lookup(sender_is_admin, request.recipient_type) {
            self.directory.users_in_role(Role::Admin).await?
        } else {
            Vec::new()
        };
        let decision = resolve_recipient(
            sender_is_admin,
            request.recipient_type,
            request.recipient_id.as_deref(),
            &admins,
        );
        if let RoutingDecision::Accepted {
            recipient,
            redirected: true,
        } = &decision
        {
            info!(requested = ?request.recipient_id, routed_to = ?recipient.recipient_id(), "Non-admin message redirected to admin");
        }
        let recipient = decision.into_result().inspect_err(|e| warn!("Message rejected: {}", e))?;

        // 3. Replies: flat threads, individual only
        if let Some(parent_id) = request.parent_message_id {
            self.check_reply_target(parent_id, &recipient).await?;
        }

        // 4. Persist
        let draft = CreateMessageDTO {
            sender_id: caller.user_id.clone(),
            recipient_id: recipient.recipient_id().map(str::to_string),
            recipient_type: recipient.recipient_type(),
            subject: request.subject,
            content: request.content,
            parent_message_id: request.parent_message_id,
            sent_at: Utc::now(),
        };
        let message = self.store.insert(&draft).await?;
        info!(message_id = message.message_id, "Message stored");

        // 5. Notify
        self.events.publish(MessageSentEvent::from(&message));

        Ok(message.message_id)
    }

    async fn check_reply_target(&self, parent_id: i32, recipient: &Recipient) -> Result<(), MailError> {
        if recipient.recipient_type() == RecipientType::All {
            warn!(parent_id, "Broadcast reply rejected");
            return Err(MailError::BadRequest("Replies cannot be sent to all users"));
        }
        let parent = self.store.get(parent_id).await?.ok_or_else(|| {
            warn!(parent_id, "Reply to unknown message");
            MailError::BadRequest("Parent message not found")
        })?;
        if !parent.is_root() {
            warn!(parent_id, "Reply to a reply rejected");
            return Err(MailError::BadRequest("Replies must reference a root message"));
        }
        Ok(())
    }

    pub async fn inbox(&self, caller: &Caller) -> Result<Vec<InboxItemDTO>, MailError> {
        projector::list_inbox(self.store(), self.directory(), &caller.user_id).await
    }

    pub async fn sent(&self, caller: &Caller) -> Result<Vec<SentItemDTO>, MailError> {
        projector::list_sent(self.store(), self.directory(), &caller.user_id).await
    }

    pub async fn thread(&self, caller: &Caller, message_id: i32) -> Result<ThreadDTO, MailError> {
        threads::get_thread(self.store(), self.directory(), message_id, &caller.user_id).await
    }

    pub async fn recipients(&self, caller: &Caller) -> Result<RecipientDirectoryDTO, MailError> {
        recipients::list_recipients(self.directory(), caller).await
    }
}
