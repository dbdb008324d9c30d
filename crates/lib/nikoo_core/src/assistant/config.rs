//! Assistant configuration.

use url::Url;

use super::AssistantError;

/// Default chat-completions endpoint (Groq's OpenAI-compatible API).
const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default model served by the support assistant.
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the assistant provider call.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Full URL of the chat-completions endpoint.
    pub api_url: String,
    /// API key. `None` means the assistant is unconfigured; replies fall back.
    pub api_key: Option<String>,
    /// Model name sent to the provider.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Reply length cap in tokens.
    pub max_tokens: u32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl AssistantConfig {
    /// Reads configuration from environment variables with defaults.
    ///
    /// | Variable            | Default                                |
    /// |---------------------|----------------------------------------|
    /// | `ASSISTANT_API_URL` | Groq chat-completions endpoint         |
    /// | `GROQ_API_KEY`      | unset (assistant unconfigured)         |
    /// | `OPENAI_API_KEY`    | fallback when `GROQ_API_KEY` is unset  |
    /// | `ASSISTANT_MODEL`   | `llama-3.3-70b-versatile`              |
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("ASSISTANT_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.into()),
            // Empty values count as unset, same as the JWT secret resolution.
            api_key: ["GROQ_API_KEY", "OPENAI_API_KEY"]
                .iter()
                .find_map(|var| std::env::var(var).ok().filter(|k| !k.is_empty())),
            model: std::env::var("ASSISTANT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
            temperature: 0.5,
            max_tokens: 500,
            top_p: 0.95,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Validate the endpoint URL.
    pub fn validate(&self) -> Result<(), AssistantError> {
        Url::parse(&self.api_url)
            .map(|_| ())
            .map_err(|e| AssistantError::Config(format!("invalid assistant API URL: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_url_is_valid() {
        let config = AssistantConfig {
            api_url: DEFAULT_API_URL.into(),
            api_key: None,
            model: DEFAULT_MODEL.into(),
            temperature: 0.5,
            max_tokens: 500,
            top_p: 0.95,
            timeout_secs: 30,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bad_url_is_rejected() {
        let config = AssistantConfig {
            api_url: "not a url".into(),
            api_key: None,
            model: DEFAULT_MODEL.into(),
            temperature: 0.5,
            max_tokens: 500,
            top_p: 0.95,
            timeout_secs: 30,
        };
        assert!(matches!(
            config.validate(),
            Err(AssistantError::Config(_))
        ));
    }
}
