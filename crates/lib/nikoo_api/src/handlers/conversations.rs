//! Conversations request handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use uuid::Uuid;

use nikoo_core::conversations;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::Identity;
use crate::models::{ConversationListResponse, ConversationResponse, RenameConversationRequest};
use crate::services::chat::conversation_not_found;

/// `GET /api/conversations` — list the caller's conversations with counts.
pub async fn list_conversations_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<ConversationListResponse>> {
    let rows = conversations::list_conversations(&state.pool, &identity.user_id).await?;
    Ok(Json(ConversationListResponse {
        conversations: rows.into_iter().map(Into::into).collect(),
    }))
}

/// `POST /api/conversations` — create a conversation.
pub async fn create_conversation_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<(StatusCode, Json<ConversationResponse>)> {
    let row = conversations::create_conversation(&state.pool, &identity.user_id).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// `PATCH /api/conversations/{id}` — rename a conversation.
pub async fn rename_conversation_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<RenameConversationRequest>,
) -> AppResult<Json<ConversationResponse>> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }

    let row = conversations::rename_conversation(&state.pool, &identity.user_id, &id, title)
        .await
        .map_err(conversation_not_found)?;
    Ok(Json(row.into()))
}

/// `DELETE /api/conversations/{id}` — delete a conversation and its messages.
pub async fn delete_conversation_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let removed = conversations::delete_conversation(&state.pool, &identity.user_id, &id).await?;
    if !removed {
        return Err(AppError::NotFound("Conversation not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
