//! Groq chat-completions client (OpenAI-compatible wire format).
//!
//! All wire types are private to this module — callers see only
//! `complete_with_retry`. One request/response round-trip per attempt,
//! two attempts with exponential backoff.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::{Duration, sleep};
use tracing::{debug, error, warn};

use super::config::AssistantConfig;
use super::{AssistantError, ChatTurn, prompt};

/// Attempts per reply, including the first.
const MAX_ATTEMPTS: u32 = 2;

/// Backoff cap between attempts, in seconds.
const MAX_BACKOFF_SECS: u64 = 5;

/// Request a completion, retrying on failure.
pub(super) async fn complete_with_retry(
    client: &Client,
    config: &AssistantConfig,
    history: &[ChatTurn],
) -> Result<String, AssistantError> {
    let payload = build_request(config, history);
    let mut last_error = None;

    for attempt in 0..MAX_ATTEMPTS {
        match request_completion(client, config, &payload).await {
            Ok(text) => return Ok(text),
            Err(e) => {
                warn!(attempt, error = %e, "assistant request failed");
                last_error = Some(e);
            }
        }

        // Exponential backoff before retry
        if attempt + 1 < MAX_ATTEMPTS {
            let backoff = Duration::from_secs((1u64 << attempt).min(MAX_BACKOFF_SECS));
            sleep(backoff).await;
        }
    }

    Err(last_error.unwrap_or_else(|| {
        AssistantError::Provider(format!("no reply after {MAX_ATTEMPTS} attempts"))
    }))
}

/// Build the chat-completions payload: system prompt first, then history.
fn build_request(config: &AssistantConfig, history: &[ChatTurn]) -> ChatCompletionRequest {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(WireMessage {
        role: "system".to_string(),
        content: prompt::system_prompt(),
    });
    for turn in history {
        let role = if turn.sender == crate::conversations::SENDER_USER {
            "user"
        } else {
            "assistant"
        };
        messages.push(WireMessage {
            role: role.to_string(),
            content: turn.content.clone(),
        });
    }

    ChatCompletionRequest {
        model: config.model.clone(),
        messages,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        top_p: config.top_p,
    }
}

/// One round-trip against the provider.
async fn request_completion(
    client: &Client,
    config: &AssistantConfig,
    payload: &ChatCompletionRequest,
) -> Result<String, AssistantError> {
    debug!(
        model = %payload.model,
        turns = payload.messages.len(),
        "sending assistant request"
    );

    let mut req = client
        .post(&config.api_url)
        .timeout(Duration::from_secs(config.timeout_secs))
        .json(payload);
    if let Some(key) = &config.api_key {
        req = req.bearer_auth(key);
    }

    let response = req.send().await.map_err(|e| {
        error!(url = %config.api_url, error = %e, "assistant HTTP request failed");
        AssistantError::Provider(e.to_string())
    })?;

    let response = check_status(response).await?;

    let parsed = response
        .json::<ChatCompletionResponse>()
        .await
        .map_err(|e| AssistantError::Provider(format!("failed to parse response body: {e}")))?;

    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    Ok(text)
}

/// Consume the response and return it if successful, or a classified error.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AssistantError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    let message = if let Ok(env) = serde_json::from_str::<ErrorEnvelope>(&body) {
        format!("HTTP {status}: {}", env.error.message)
    } else {
        format!("HTTP {status}: {body}")
    };

    error!(%status, %message, "assistant request returned HTTP error");

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || message.to_lowercase().contains("rate_limit")
    {
        return Err(AssistantError::RateLimited(message));
    }
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(AssistantError::Config(message));
    }
    Err(AssistantError::Provider(message))
}

// ── Private wire types ──

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// Error envelope used by Groq and other OpenAI-compatible APIs.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversations::{SENDER_AI, SENDER_USER};

    fn test_config() -> AssistantConfig {
        AssistantConfig {
            api_url: "http://localhost/v1/chat/completions".into(),
            api_key: Some("test-key".into()),
            model: "llama-3.3-70b-versatile".into(),
            temperature: 0.5,
            max_tokens: 500,
            top_p: 0.95,
            timeout_secs: 30,
        }
    }

    #[test]
    fn system_prompt_leads_the_payload() {
        let payload = build_request(&test_config(), &[]);
        assert_eq!(payload.messages[0].role, "system");
        assert!(payload.messages[0].content.contains("mobile app"));
    }

    #[test]
    fn history_senders_map_to_wire_roles() {
        let history = vec![
            ChatTurn {
                sender: SENDER_USER.into(),
                content: "How do I withdraw?".into(),
            },
            ChatTurn {
                sender: SENDER_AI.into(),
                content: "Wallet → Request Payout.".into(),
            },
        ];
        let payload = build_request(&test_config(), &history);
        let roles: Vec<&str> = payload.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant"]);
    }

    #[test]
    fn payload_carries_sampling_parameters() {
        let payload = build_request(&test_config(), &[]);
        let json = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["max_tokens"], 500);
        assert_eq!(json["top_p"], 0.95f32 as f64);
    }
}
