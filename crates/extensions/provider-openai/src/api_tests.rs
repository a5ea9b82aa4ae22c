use super::*;
use serde_json::json;

#[test]
fn test_request_serialization() {
    let request = ApiRequest {
        model: "gpt-3.5-turbo",
        messages: vec![ApiMessage::user("Hi")],
        max_tokens: 200,
        temperature: Some(0.5),
    };
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(
        value,
        json!({
            "model": "gpt-3.5-turbo",
            "messages": [{ "role": "user", "content": "Hi" }],
            "max_tokens": 200,
            "temperature": 0.5
        })
    );
}

#[test]
fn test_request_without_temperature() {
    let request = ApiRequest {
        model: "m",
        messages: vec![ApiMessage::user("Hi")],
        max_tokens: 50,
        temperature: None,
    };
    let value = serde_json::to_value(&request).unwrap();
    assert!(value.get("temperature").is_none());
}

#[test]
fn test_extract_text() {
    let body = json!({ "choices": [{ "message": { "role": "assistant", "content": "Hello" } }] });
    assert_eq!(extract_text(&body), Some("Hello".to_string()));
}

#[test]
fn test_extract_text_missing_fields() {
    assert_eq!(extract_text(&json!({ "choices": [] })), None);
    assert_eq!(extract_text(&json!({ "choices": [{ "message": {} }] })), None);
    assert_eq!(extract_text(&json!({ "error": "nope" })), None);
    assert_eq!(
        extract_text(&json!({ "choices": [{ "message": { "content": null } }] })),
        None
    );
}
