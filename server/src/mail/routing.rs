//! Routing Policy - Who a new message may be addressed to
//!
//! Pure decision function, no I/O. The caller looks up the admin set and
//! passes it in.

use crate::core::MailError;
use crate::entities::{RecipientType, User};

/// Where an accepted message goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    Individual(String),
    Broadcast,
}

impl Recipient {
    pub fn recipient_type(&self) -> RecipientType {
        match self {
            Recipient::Individual(_) => RecipientType::Individual,
            Recipient::Broadcast => RecipientType::All,
        }
    }

    pub fn recipient_id(&self) -> Option<&str> {
        match self {
            Recipient::Individual(id) => Some(id),
            Recipient::Broadcast => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Non-admins cannot broadcast
    Forbidden,
    /// A non-admin wrote but nobody holds the Admin role
    NoAdminAvailable,
    /// Admin individual message without a target
    MissingRecipient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    Accepted {
        recipient: Recipient,
        /// true when the caller-supplied recipient was replaced
        redirected: bool,
    },
    Rejected(Rejection),
}

impl RoutingDecision {
    pub fn into_result(self) -> Result<Recipient, MailError> {
        match self {
            RoutingDecision::Accepted { recipient, .. } => Ok(recipient),
            RoutingDecision::Rejected(Rejection::Forbidden) => Err(MailError::Forbidden),
            RoutingDecision::Rejected(Rejection::NoAdminAvailable) => {
                Err(MailError::NoAdminAvailable)
            }
            RoutingDecision::Rejected(Rejection::MissingRecipient) => {
                Err(MailError::MissingRecipient)
            }
        }
    }
}

/// Whether `resolve_recipient` will need the admin set for this request.
pub fn needs_admin_lookup(sender_is_admin: bool, requested_type: RecipientType) -> bool {
    !sender_is_admin && requested_type == RecipientType::Individual
}

/// Applies the routing rules in order:
/// 1. non-admins may only send individual messages
/// 2. non-admin messages always go to the first admin (`admins` sorted by id),
///    whatever recipient the client asked for
/// 3. admin individual messages need a recipient id
/// 4. admin broadcasts have no recipient
/// 5. anything else is taken as requested
pub fn resolve_recipient(
    sender_is_admin: bool,
    requested_type: RecipientType,
    requested_recipient_id: Option<&str>,
    admins: &[User],
) -> RoutingDecision {
    if !sender_is_admin && requested_type != RecipientType::Individual {
        return RoutingDecision::Rejected(Rejection::Forbidden);
    }

    if !sender_is_admin {
        return match admins.first() {
            None => RoutingDecision::Rejected(Rejection::NoAdminAvailable),
            Some(admin) => RoutingDecision::Accepted {
                redirected: requested_recipient_id != Some(admin.user_id.as_str()),
                recipient: Recipient::Individual(admin.user_id.clone()),
            },
        };
    }

    let requested_recipient_id = requested_recipient_id.filter(|id| !id.is_empty());
    match (requested_type, requested_recipient_id) {
        (RecipientType::Individual, None) => {
            RoutingDecision::Rejected(Rejection::MissingRecipient)
        }
        (RecipientType::Individual, Some(id)) => RoutingDecision::Accepted {
            recipient: Recipient::Individual(id.to_string()),
            redirected: false,
        },
        (RecipientType::All, _) => RoutingDecision::Accepted {
            recipient: Recipient::Broadcast,
            redirected: false,
        },
    }
}
