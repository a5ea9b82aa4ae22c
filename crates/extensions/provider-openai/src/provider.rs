//! OpenAI provider implementation.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use zegoop_protocols::{CompletionRequest, CompletionResponse, LLMProvider, ProviderError};

use crate::api::{extract_text, ApiMessage, ApiRequest};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_MAX_TOKENS: u32 = 200;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// OpenAI chat completions provider.
pub struct OpenAIProvider {
    api_url: String,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
    client: reqwest::Client,
}

impl OpenAIProvider {
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: Some(DEFAULT_TEMPERATURE),
            client: reqwest::Client::new(),
        }
    }

    /// Point at a custom endpoint (an OpenAI-compatible API or a mock).
    pub fn with_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn build_request<'a>(&'a self, request: &'a CompletionRequest) -> ApiRequest<'a> {
        ApiRequest {
            model: &self.model,
            messages: vec![ApiMessage::user(&request.prompt)],
            max_tokens: request.max_tokens.unwrap_or(self.max_tokens),
            temperature: self.temperature.filter(|_| !request.bare),
        }
    }

    async fn send_request(
        &self,
        api_key: &str,
        api_request: &ApiRequest<'_>,
    ) -> Result<Value, ProviderError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(api_request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        debug!("OpenAI responded with {}", status);
        if !status.is_success() {
            return Err(ProviderError::from_status(
                status.as_u16(),
                status.canonical_reason(),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

impl Default for OpenAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn id(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let api_request = self.build_request(&request);
        let body = self.send_request(&request.api_key, &api_request).await?;
        Ok(CompletionResponse::from_extracted(extract_text(&body)))
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
