use super::*;
use serde_json::json;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

#[test]
fn test_provider_defaults() {
    let provider = AnthropicProvider::new();
    assert_eq!(provider.id(), "anthropic");
    assert_eq!(provider.model(), DEFAULT_MODEL);
    assert_eq!(provider.api_url, "https://api.anthropic.com/v1/messages");
    assert_eq!(provider.max_tokens, 200);
    assert!(provider.temperature.is_none());
}

#[tokio::test]
async fn test_complete_sends_headers_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::header("x-api-key", "sk-ant-test"))
        .and(matchers::header("anthropic-version", "2023-06-01"))
        .and(matchers::body_json(json!({
            "model": "claude-3-haiku-20240307",
            "max_tokens": 50,
            "messages": [{ "role": "user", "content": "ping" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [{ "type": "text", "text": "Test successful" }],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = AnthropicProvider::new().with_url(mock_server.uri());
    let response = provider
        .complete(CompletionRequest::new("ping", "sk-ant-test").with_max_tokens(50))
        .await
        .unwrap();

    assert_eq!(response.text, "Test successful");
}

#[tokio::test]
async fn test_complete_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let provider = AnthropicProvider::new().with_url(mock_server.uri());
    let result = provider.complete(CompletionRequest::new("ping", "k")).await;

    match result {
        Err(ProviderError::Http { status, .. }) => assert_eq!(status, 529),
        other => panic!("expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_complete_malformed_payload_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": "not a list" })))
        .mount(&mock_server)
        .await;

    let provider = AnthropicProvider::new().with_url(mock_server.uri());
    let response = provider
        .complete(CompletionRequest::new("ping", "k"))
        .await
        .unwrap();
    assert_eq!(response.text, "No response received");
}
