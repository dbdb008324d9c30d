//! Assistant client tests against a mock chat-completions server.

use nikoo_core::assistant::{self, AssistantError, ChatTurn, config::AssistantConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> AssistantConfig {
    AssistantConfig {
        api_url: format!("{}/v1/chat/completions", server.uri()),
        api_key: Some("test-key".into()),
        model: "llama-3.3-70b-versatile".into(),
        temperature: 0.5,
        max_tokens: 500,
        top_p: 0.95,
        timeout_secs: 5,
    }
}

fn user_turn(content: &str) -> ChatTurn {
    ChatTurn {
        sender: "user".into(),
        content: content.into(),
    }
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

#[tokio::test]
async fn returns_trimmed_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            "  Go to Wallet → + Add Credits.  ",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let reply = assistant::generate_reply(
        &client,
        &config_for(&server),
        &[user_turn("How do I add money?")],
    )
    .await
    .expect("reply");

    assert_eq!(reply, "Go to Wallet → + Add Credits.");
}

#[tokio::test]
async fn retries_once_after_server_error() {
    let server = MockServer::start().await;
    // First attempt fails, second succeeds.
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Recovered.")))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let reply = assistant::generate_reply(&client, &config_for(&server), &[user_turn("hi")])
        .await
        .expect("reply after retry");

    assert_eq!(reply, "Recovered.");
}

#[tokio::test]
async fn rate_limit_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "rate_limit_exceeded: slow down" }
        })))
        // Both attempts hit the limiter.
        .expect(2)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let err = assistant::generate_reply(&client, &config_for(&server), &[user_turn("hi")])
        .await
        .expect_err("rate limited");

    assert!(matches!(err, AssistantError::RateLimited(_)), "got {err:?}");
}

#[tokio::test]
async fn invalid_key_is_config_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "invalid api_key" }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let err = assistant::generate_reply(&client, &config_for(&server), &[user_turn("hi")])
        .await
        .expect_err("config error");

    assert!(matches!(err, AssistantError::Config(_)), "got {err:?}");
}

#[tokio::test]
async fn missing_key_short_circuits() {
    // No server: the call must fail before any HTTP request.
    let config = AssistantConfig {
        api_url: "http://127.0.0.1:9/v1/chat/completions".into(),
        api_key: None,
        model: "llama-3.3-70b-versatile".into(),
        temperature: 0.5,
        max_tokens: 500,
        top_p: 0.95,
        timeout_secs: 5,
    };

    let client = reqwest::Client::new();
    let err = assistant::generate_reply(&client, &config, &[user_turn("hi")])
        .await
        .expect_err("unconfigured");

    assert!(matches!(err, AssistantError::Config(_)), "got {err:?}");
}

#[tokio::test]
async fn empty_reply_falls_back_to_canned_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("   ")))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let reply = assistant::generate_reply(&client, &config_for(&server), &[user_turn("hi")])
        .await
        .expect("fallback reply");

    assert_eq!(reply, assistant::EMPTY_REPLY_FALLBACK);
}
