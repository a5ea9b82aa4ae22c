//! Anthropic messages wire types.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct ApiRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub messages: Vec<ApiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct ApiMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// `content[0].text`, if it is a string.
pub fn extract_text(body: &Value) -> Option<String> {
    body.pointer("/content/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
}
