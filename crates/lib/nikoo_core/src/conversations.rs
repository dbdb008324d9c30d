//! Conversation and message persistence.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::uuid::uuidv7;

/// Title given to a conversation before its first user message names it.
pub const DEFAULT_TITLE: &str = "New Conversation";

/// Sender value for end-user messages.
pub const SENDER_USER: &str = "user";

/// Sender value for assistant messages.
pub const SENDER_AI: &str = "ai";

/// Maximum number of characters of the first message used as the title.
const TITLE_MAX_CHARS: usize = 50;

/// Row returned by conversation queries.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConversationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Conversation row plus its message count, for listings.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConversationSummaryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row returned by message queries.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MessageRow {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Derive a conversation title from its first user message.
///
/// First 50 characters, with `"..."` appended when truncated.
pub fn derive_title(content: &str) -> String {
    let mut title: String = content.chars().take(TITLE_MAX_CHARS).collect();
    if content.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

/// List conversations for a user with message counts, most recently updated first.
pub async fn list_conversations(
    pool: &PgPool,
    user_id: &Uuid,
) -> Result<Vec<ConversationSummaryRow>, sqlx::Error> {
    sqlx::query_as::<_, ConversationSummaryRow>(
        r#"
        SELECT c.id, c.user_id, c.title, COUNT(m.id) AS message_count,
               c.created_at, c.updated_at
        FROM conversations c
        LEFT JOIN messages m ON m.conversation_id = c.id
        WHERE c.user_id = $1
        GROUP BY c.id
        ORDER BY c.updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Create a new conversation with the default title.
pub async fn create_conversation(
    pool: &PgPool,
    user_id: &Uuid,
) -> Result<ConversationRow, sqlx::Error> {
    sqlx::query_as::<_, ConversationRow>(
        r#"
        INSERT INTO conversations (id, user_id, title)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, title, created_at, updated_at
        "#,
    )
    .bind(uuidv7())
    .bind(user_id)
    .bind(DEFAULT_TITLE)
    .fetch_one(pool)
    .await
}

/// Get a conversation by ID (scoped to user).
pub async fn get_conversation(
    pool: &PgPool,
    user_id: &Uuid,
    conversation_id: &Uuid,
) -> Result<ConversationRow, sqlx::Error> {
    sqlx::query_as::<_, ConversationRow>(
        r#"
        SELECT id, user_id, title, created_at, updated_at
        FROM conversations
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(conversation_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Update a conversation title.
pub async fn rename_conversation(
    pool: &PgPool,
    user_id: &Uuid,
    conversation_id: &Uuid,
    title: &str,
) -> Result<ConversationRow, sqlx::Error> {
    sqlx::query_as::<_, ConversationRow>(
        r#"
        UPDATE conversations
        SET title = $1, updated_at = now()
        WHERE id = $2 AND user_id = $3
        RETURNING id, user_id, title, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(conversation_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Delete a conversation (messages cascade). Returns whether a row was removed.
pub async fn delete_conversation(
    pool: &PgPool,
    user_id: &Uuid,
    conversation_id: &Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM conversations WHERE id = $1 AND user_id = $2")
        .bind(conversation_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Append a message to a conversation, touching `updated_at`.
pub async fn append_message(
    pool: &PgPool,
    conversation_id: &Uuid,
    sender: &str,
    content: &str,
) -> Result<MessageRow, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, MessageRow>(
        r#"
        INSERT INTO messages (id, conversation_id, sender, content)
        VALUES ($1, $2, $3, $4)
        RETURNING id, conversation_id, sender, content, created_at
        "#,
    )
    .bind(uuidv7())
    .bind(conversation_id)
    .bind(sender)
    .bind(content)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE conversations SET updated_at = now() WHERE id = $1")
        .bind(conversation_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(row)
}

/// Get messages for a conversation in insertion order.
///
/// Message IDs are UUIDv7, so `ORDER BY id` is time order.
pub async fn list_messages(
    pool: &PgPool,
    conversation_id: &Uuid,
) -> Result<Vec<MessageRow>, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT id, conversation_id, sender, content, created_at
        FROM messages
        WHERE conversation_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_is_title_verbatim() {
        assert_eq!(derive_title("How do I add credits?"), "How do I add credits?");
    }

    #[test]
    fn long_content_is_truncated_with_ellipsis() {
        let content = "a".repeat(80);
        let title = derive_title(&content);
        assert_eq!(title, format!("{}...", "a".repeat(50)));
    }

    #[test]
    fn exactly_fifty_chars_is_not_truncated() {
        let content = "b".repeat(50);
        assert_eq!(derive_title(&content), content);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 60 multi-byte chars; byte-slicing at 50 would panic
        let content = "প".repeat(60);
        let title = derive_title(&content);
        assert_eq!(title.chars().count(), 53);
        assert!(title.ends_with("..."));
    }
}
