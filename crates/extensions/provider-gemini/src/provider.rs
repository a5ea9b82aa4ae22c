//! Gemini provider implementation.

use async_trait::async_trait;

use zegoop_protocols::{CompletionRequest, CompletionResponse, LLMProvider, ProviderError};

use crate::client::GeminiClient;
use crate::types::{extract_text, GenerateContentRequest, GenerationConfig};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Google Gemini provider.
///
/// Sends no generation config unless a token limit or temperature was
/// configured or requested.
pub struct GeminiProvider {
    client: GeminiClient,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl GeminiProvider {
    pub fn new() -> Self {
        Self {
            client: GeminiClient::default(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: None,
            temperature: None,
        }
    }

    /// Use a different models root (`.../v1beta/models`).
    pub fn with_url(mut self, base_url: impl Into<String>) -> Self {
        self.client = GeminiClient::new(base_url);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// A bare request carries the prompt alone.
    fn generation_config(&self, request: &CompletionRequest) -> Option<GenerationConfig> {
        if request.bare {
            return None;
        }
        let config = GenerationConfig {
            temperature: self.temperature,
            max_output_tokens: request.max_tokens.or(self.max_tokens),
        };
        (config != GenerationConfig::default()).then_some(config)
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    fn id(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let mut api_request = GenerateContentRequest::prompt(&request.prompt);
        api_request.generation_config = self.generation_config(&request);

        let body = self
            .client
            .generate_content(&self.model, &request.api_key, &api_request)
            .await?;
        Ok(CompletionResponse::from_extracted(extract_text(&body)))
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
