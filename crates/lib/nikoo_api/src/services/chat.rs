//! Chat service — message flow orchestration.
//!
//! `send_message` is the heart of the app: persist the user's message,
//! auto-title the conversation, call the assistant over the full history,
//! and persist whatever comes back. An assistant failure never fails the
//! request — a canned fallback reply is stored and returned instead, so the
//! chat transcript stays coherent for the user.

use tracing::warn;
use uuid::Uuid;

use nikoo_core::assistant::{self, AssistantError, ChatTurn};
use nikoo_core::conversations::{
    self, DEFAULT_TITLE, MessageRow, SENDER_AI, SENDER_USER, derive_title,
};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::Identity;

/// Map a conversation lookup failure to the API-level not-found error.
pub fn conversation_not_found(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::RowNotFound => AppError::NotFound("Conversation not found".into()),
        e => e.into(),
    }
}

/// Canned reply stored when the assistant cannot be reached.
fn fallback_reply(error: &AssistantError) -> &'static str {
    match error {
        AssistantError::RateLimited(_) => {
            "I'm busy helping other users. Please wait a moment and try again."
        }
        AssistantError::Config(_) => {
            "Service configuration error. Please contact support at nikoo@app.com"
        }
        AssistantError::Provider(_) => {
            "I'm temporarily unavailable. Please try again in a moment."
        }
    }
}

/// Handle an incoming user message and produce the assistant reply.
pub async fn send_message(
    state: &AppState,
    identity: &Identity,
    conversation_id: &Uuid,
    content: &str,
) -> AppResult<MessageRow> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("Message content is required".into()));
    }

    let conversation =
        conversations::get_conversation(&state.pool, &identity.user_id, conversation_id)
            .await
            .map_err(conversation_not_found)?;

    conversations::append_message(&state.pool, &conversation.id, SENDER_USER, content).await?;

    // First user message names the conversation.
    if conversation.title == DEFAULT_TITLE {
        conversations::rename_conversation(
            &state.pool,
            &identity.user_id,
            &conversation.id,
            &derive_title(content),
        )
        .await?;
    }

    let history = conversations::list_messages(&state.pool, &conversation.id).await?;
    let turns: Vec<ChatTurn> = history
        .into_iter()
        .map(|m| ChatTurn {
            sender: m.sender,
            content: m.content,
        })
        .collect();

    let reply =
        match assistant::generate_reply(&state.http, &state.config.assistant, &turns).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, conversation = %conversation.id, "assistant unavailable, storing fallback reply");
                fallback_reply(&e).to_string()
            }
        };

    let ai_message =
        conversations::append_message(&state.pool, &conversation.id, SENDER_AI, &reply).await?;

    Ok(ai_message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_gets_busy_reply() {
        let reply = fallback_reply(&AssistantError::RateLimited("429".into()));
        assert!(reply.contains("busy helping other users"));
    }

    #[test]
    fn config_error_points_at_support() {
        let reply = fallback_reply(&AssistantError::Config("no key".into()));
        assert!(reply.contains("nikoo@app.com"));
    }

    #[test]
    fn other_errors_get_unavailable_reply() {
        let reply = fallback_reply(&AssistantError::Provider("boom".into()));
        assert!(reply.contains("temporarily unavailable"));
    }

    #[test]
    fn missing_conversation_maps_to_not_found() {
        let err = conversation_not_found(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::NotFound(m) if m == "Conversation not found"));
    }
}
