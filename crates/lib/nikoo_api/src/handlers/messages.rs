//! Messages request handlers.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use uuid::Uuid;

use nikoo_core::conversations;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::Identity;
use crate::models::{MessageResponse, SendMessageRequest};
use crate::services::chat::{self, conversation_not_found};

/// `GET /api/conversations/{id}/messages` — full transcript, oldest first.
pub async fn list_messages_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<MessageResponse>>> {
    // Ownership check first: an unknown or foreign conversation is a 404.
    let conversation = conversations::get_conversation(&state.pool, &identity.user_id, &id)
        .await
        .map_err(conversation_not_found)?;

    let rows = conversations::list_messages(&state.pool, &conversation.id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// `POST /api/conversations/{id}/messages` — send a message, get the reply.
pub async fn send_message_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<SendMessageRequest>,
) -> AppResult<Json<MessageResponse>> {
    let reply = chat::send_message(&state, &identity, &id, &body.content).await?;
    Ok(Json(reply.into()))
}
