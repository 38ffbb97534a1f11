//! Message services - HTTP handlers for the mail endpoints

use crate::core::{AppError, AppState, Caller};
use crate::dtos::{
    InboxItemDTO, RecipientDirectoryDTO, SendMessageDTO, SendMessageResponseDTO, SentItemDTO,
    ThreadDTO,
};
use axum::{
    Extension,
    extract::{Json, Path, State},
};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/* estrattori nell'ordine giusto: Json consuma il body quindi deve stare ultimo
        State(state): State<Arc<AppState>>,
        Path(message_id): Path<i32>,            // parametro dalla URL /api/messages/{id}
        Extension(caller): Extension<Caller>,   // inserito dall'authentication_middleware
        Json(body): Json<SendMessageDTO>,       // JSON body
*/

#[instrument(skip(state, caller), fields(user_id = %caller.user_id))]
pub async fn get_inbox(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<InboxItemDTO>>, AppError> {
    debug!("Listing inbox");
    let items = state.mailbox.inbox(&caller).await?;
    info!("Returning {} inbox messages", items.len());
    Ok(Json(items))
}

#[instrument(skip(state, caller), fields(user_id = %caller.user_id))]
pub async fn get_sent(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<SentItemDTO>>, AppError> {
    debug!("Listing sent messages");
    let items = state.mailbox.sent(&caller).await?;
    info!("Returning {} sent messages", items.len());
    Ok(Json(items))
}

#[instrument(skip(state, caller), fields(user_id = %caller.user_id, message_id = %message_id))]
pub async fn get_message(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<i32>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<ThreadDTO>, AppError> {
    // 1. Caricare root e risposte
    // 2. Se il chiamante è il destinatario e il messaggio non è letto, marcarlo come letto
    // 3. Risolvere i nomi e ritornare il thread
    let thread = state.mailbox.thread(&caller, message_id).await?;
    Ok(Json(thread))
}

#[instrument(skip(state, caller, body), fields(user_id = %caller.user_id))]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<SendMessageDTO>,
) -> Result<Json<SendMessageResponseDTO>, AppError> {
    // 1. Validare subject e content
    // 2. Applicare le regole di routing (i non admin scrivono sempre a un admin)
    // 3. Salvare il messaggio e notificare l'hub
    let message_id = state.mailbox.send(&caller, body).await?;
    info!(message_id, "Message sent");
    Ok(Json(SendMessageResponseDTO {
        success: true,
        message_id,
    }))
}

#[debug_handler]
#[instrument(skip(state, caller), fields(user_id = %caller.user_id))]
pub async fn get_recipients(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<RecipientDirectoryDTO>, AppError> {
    debug!("Listing recipient directory");
    let directory = state.mailbox.recipients(&caller).await?;
    info!(
        parents = directory.parents.len(),
        teachers = directory.teachers.len(),
        "Returning recipient directory"
    );
    Ok(Json(directory))
}
