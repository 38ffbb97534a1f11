//! Recipient Directory - admin-only compose helper

use crate::core::{Caller, MailError};
use crate::dtos::{RecipientDTO, RecipientDirectoryDTO};
use crate::entities::Role;
use crate::repositories::UserDirectory;
use futures::future::try_join;
use tracing::{info, instrument, warn};

#[instrument(skip(directory, caller), fields(user_id = %caller.user_id))]
pub async fn list_recipients(
    directory: &dyn UserDirectory,
    caller: &Caller,
) -> Result<RecipientDirectoryDTO, MailError> {
    if !caller.is_admin() {
        warn!("Recipient directory requested by a non-admin");
        return Err(MailError::Forbidden);
    }

    let (parents, teachers) = try_join(
        directory.users_in_role(Role::Parent),
        directory.users_in_role(Role::Teacher),
    )
    .await?;

    info!(parents = parents.len(), teachers = teachers.len(), "Recipient directory listed");
    Ok(RecipientDirectoryDTO {
        parents: parents.into_iter().map(RecipientDTO::from).collect(),
        teachers: teachers.into_iter().map(RecipientDTO::from).collect(),
    })
}
