//! Connectivity probe against a mock completion endpoint

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use model_chooser::{CatalogClient, ChooserConfig, ProbeOutcome, TokenUsage};

fn client_for(server: &MockServer) -> CatalogClient {
    let config = ChooserConfig::default()
        .with_endpoint(format!("{}/api/v1/models", server.uri()))
        .with_chat_endpoint(format!("{}/api/v1/chat/completions", server.uri()));
    CatalogClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_probe_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "openai/gpt-4o-mini",
            "messages": [{ "role": "user", "content": "ping" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "gen-1",
            "choices": [{ "message": { "role": "assistant", "content": "pong" } }],
            "usage": { "prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server)
        .test_model("openai/gpt-4o-mini", Some("sk-test"), Some("ping"))
        .await;

    assert_eq!(
        outcome,
        ProbeOutcome::Success {
            response: "pong".to_string(),
            usage: Some(TokenUsage {
                prompt_tokens: 3,
                completion_tokens: 1,
                total_tokens: 4,
            }),
        }
    );
}

#[tokio::test]
async fn test_probe_provider_error_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "No auth credentials found", "code": 401 }
        })))
        .mount(&server)
        .await;

    let outcome = client_for(&server)
        .test_model("openai/gpt-4o-mini", Some("sk-bad"), None)
        .await;
    assert_eq!(outcome.error(), Some("HTTP 401: No auth credentials found"));
}

#[tokio::test]
async fn test_probe_plain_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let outcome = client_for(&server)
        .test_model("openai/gpt-4o-mini", Some("sk-test"), None)
        .await;
    assert_eq!(outcome.error(), Some("HTTP 502: Bad Gateway"));
}

#[tokio::test]
async fn test_probe_without_credential_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = client_for(&server).test_model("openai/gpt-4o-mini", None, None).await;
    assert!(!outcome.is_success());
}

#[tokio::test]
async fn test_probe_empty_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let outcome = client_for(&server)
        .test_model("openai/gpt-4o-mini", Some("sk-test"), None)
        .await;
    assert_eq!(outcome.error(), Some("No response content from model"));
}
