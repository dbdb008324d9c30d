//! Support assistant — reply generation via a hosted LLM.
//!
//! Calls an OpenAI-compatible `/chat/completions` endpoint (Groq by default)
//! with a static support-playbook system prompt plus the full conversation
//! history, and returns the assistant's text reply.
//!
//! # Public API
//!
//! - [`generate_reply`] — one reply for a conversation history
//! - [`config::AssistantConfig`] — resolved assistant configuration
//! - [`ChatTurn`] — one history turn handed to the provider

pub mod config;
mod groq;
pub mod prompt;

use reqwest::Client;
use thiserror::Error;
use tracing::warn;

use config::AssistantConfig;

/// Reply returned when the provider answers with empty content.
pub const EMPTY_REPLY_FALLBACK: &str =
    "I'm having trouble responding right now. Please try again.";

/// Errors that can occur while generating a reply.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// One turn of conversation history handed to the assistant.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// Stored sender value (`"user"` or `"ai"`).
    pub sender: String,
    pub content: String,
}

/// Generate an assistant reply for the given conversation history.
///
/// Retries once on failure (two attempts total) with exponential backoff.
/// An empty reply from the provider is replaced by [`EMPTY_REPLY_FALLBACK`].
pub async fn generate_reply(
    client: &Client,
    config: &AssistantConfig,
    history: &[ChatTurn],
) -> Result<String, AssistantError> {
    if config.api_key.is_none() {
        return Err(AssistantError::Config(
            "assistant API key is not configured".into(),
        ));
    }
    if history.is_empty() {
        warn!("empty conversation history passed to assistant");
    }

    let reply = groq::complete_with_retry(client, config, history).await?;
    if reply.trim().is_empty() {
        warn!("assistant returned empty reply");
        return Ok(EMPTY_REPLY_FALLBACK.to_string());
    }
    Ok(reply)
}
