//! OpenAI chat completions wire types.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct ApiRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ApiMessage<'a>>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct ApiMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ApiMessage<'a> {
    pub fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

/// `choices[0].message.content`, if it is a string.
pub fn extract_text(body: &Value) -> Option<String> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
