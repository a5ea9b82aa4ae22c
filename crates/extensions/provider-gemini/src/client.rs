//! Gemini API client.

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use zegoop_protocols::ProviderError;

use crate::types::GenerateContentRequest;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Thin HTTP client for `generateContent`.
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint for `model`, without the key.
    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Generate content and return the raw JSON body.
    pub async fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: &GenerateContentRequest<'_>,
    ) -> Result<Value, ProviderError> {
        debug!("Gemini generate_content: model={}", model);

        let response = self
            .client
            .post(self.endpoint(model))
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
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

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
