use super::*;
use serde_json::json;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

#[test]
fn test_provider_defaults() {
    let provider = GeminiProvider::new();
    assert_eq!(provider.id(), "gemini");
    assert_eq!(provider.model(), "gemini-2.0-flash");
    assert_eq!(provider.client.base_url(), crate::client::DEFAULT_BASE_URL);
}

#[test]
fn test_no_generation_config_by_default() {
    let provider = GeminiProvider::new();
    let request = CompletionRequest::new("p", "k");
    assert!(provider.generation_config(&request).is_none());
}

#[test]
fn test_generation_config_from_request() {
    let provider = GeminiProvider::new().with_temperature(0.3);
    let request = CompletionRequest::new("p", "k").with_max_tokens(50);
    let config = provider.generation_config(&request).unwrap();
    assert_eq!(config.max_output_tokens, Some(50));
    assert_eq!(config.temperature, Some(0.3));
}

#[test]
fn test_bare_request_has_no_generation_config() {
    let provider = GeminiProvider::new().with_temperature(0.3).with_max_tokens(200);
    let request = CompletionRequest::new("p", "k").with_max_tokens(50).bare();
    assert!(provider.generation_config(&request).is_none());
}

#[tokio::test]
async fn test_complete_success() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/gemini-2.0-flash:generateContent"))
        .and(matchers::query_param("key", "g-key"))
        .and(matchers::body_json(json!({
            "contents": [{ "parts": [{ "text": "Define ubiquitous" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Everywhere at once." }] }
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new().with_url(mock_server.uri());
    let response = provider
        .complete(CompletionRequest::new("Define ubiquitous", "g-key"))
        .await
        .unwrap();

    assert_eq!(response.text, "Everywhere at once.");
}

#[tokio::test]
async fn test_complete_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new().with_url(mock_server.uri());
    let result = provider.complete(CompletionRequest::new("p", "bad")).await;

    match result {
        Err(err) => assert_eq!(err.to_string(), "API request failed: 400 Bad Request"),
        Ok(response) => panic!("expected error, got {:?}", response),
    }
}

#[tokio::test]
async fn test_complete_empty_candidates_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new().with_url(mock_server.uri());
    let response = provider
        .complete(CompletionRequest::new("p", "k"))
        .await
        .unwrap();
    assert_eq!(response.text, "No response received");
}
