//! Tests for the OpenAI-compatible backend against a mock HTTP server.

use std::sync::Arc;

use kbassist_core::{ChatMessage, Error, GenerationBackend, GenerationOutcome};
use kbassist_inference::openai::{OpenAIBackend, OpenAIConfig};
use kbassist_inference::{GenerationGateway, Prompt, PromptBody};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer, api_key: Option<&str>) -> OpenAIBackend {
    OpenAIBackend::new(OpenAIConfig {
        base_url: server.uri(),
        api_key: api_key.map(str::to_string),
    })
    .expect("Failed to create backend")
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_generate_sends_model_system_and_prompt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "anthropic/claude-sonnet-4-20250514",
            "stream": false,
            "messages": [
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "hello"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("hi there")))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server, Some("test-key"));
    let text = backend.generate(Some("sys"), "hello").await.unwrap();
    assert_eq!(text, "hi there");
}

#[tokio::test]
async fn test_generate_without_system_sends_only_user() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "messages": [{"role": "user", "content": "only"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("[\"a\"]")))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server, None);
    assert_eq!(backend.generate(None, "only").await.unwrap(), "[\"a\"]");
}

#[tokio::test]
async fn test_chat_forwards_history_after_system() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "messages": [
                {"role": "system", "content": "kb"},
                {"role": "user", "content": "q1"},
                {"role": "assistant", "content": "a1"},
                {"role": "user", "content": "q2"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("a2")))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server, None);
    let history = vec![
        ChatMessage::user("q1"),
        ChatMessage::assistant("a1"),
        ChatMessage::user("q2"),
    ];
    assert_eq!(backend.chat(Some("kb"), &history).await.unwrap(), "a2");
}

#[tokio::test]
async fn test_non_success_status_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "error": {"message": "overloaded", "type": "server_error"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server, None);
    let err = backend.generate(None, "x").await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("503"), "{}", msg);
    assert!(msg.contains("overloaded"), "{}", msg);
}

#[tokio::test]
async fn test_rejected_key_is_config_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"message": "invalid key", "type": "invalid_api_key"}
        })))
        .mount(&server)
        .await;

    let backend = backend_for(&server, Some("wrong"));
    match backend.generate(None, "x").await.unwrap_err() {
        Error::Config(msg) => assert!(msg.contains("invalid key"), "{}", msg),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let backend = backend_for(&server, None);
    let err = backend.generate(None, "x").await.unwrap_err();
    assert!(matches!(err, Error::Serialization(_)), "{:?}", err);
}

#[tokio::test]
async fn test_empty_choices_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .mount(&server)
        .await;

    let backend = backend_for(&server, None);
    assert!(backend.generate(None, "x").await.is_err());
}

#[tokio::test]
async fn test_gateway_converts_http_failure_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = GenerationGateway::new(Arc::new(backend_for(&server, None)));
    let prompt = Prompt {
        system: None,
        body: PromptBody::Text("x".into()),
    };
    assert!(matches!(
        gateway.generate(&prompt).await,
        GenerationOutcome::Failed { .. }
    ));
}

#[tokio::test]
async fn test_unreachable_backend_is_failed_outcome() {
    // Nothing listens on port 9 (discard) on test hosts.
    let backend = OpenAIBackend::new(OpenAIConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: None,
    })
    .unwrap();
    let backend = Arc::new(backend);
    assert!(matches!(
        backend.generate(None, "x").await.unwrap_err(),
        Error::Request(_)
    ));

    let gateway = GenerationGateway::new(backend);
    let prompt = Prompt {
        system: None,
        body: PromptBody::Text("x".into()),
    };
    assert!(!gateway.generate(&prompt).await.is_ok());
    assert!(!gateway.is_reachable().await);
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .mount(&server)
        .await;

    let backend = backend_for(&server, None);
    assert!(backend.health_check().await.unwrap());
}
