//! LLM gateway protocol definitions.
//!
//! Each provider wraps one vendor endpoint. The credential travels with the
//! request so a provider instance holds no secrets and can be shared by all
//! surfaces.

use std::fmt;

use async_trait::async_trait;

use crate::error::ProviderError;

/// Text returned when a vendor response does not contain a reply in the
/// expected place.
pub const NO_RESPONSE_FALLBACK: &str = "No response received";

/// Core trait for LLM providers.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Returns the provider ID (`openai`, `anthropic`, ...).
    fn id(&self) -> &str;

    /// Returns the model the provider calls.
    fn model(&self) -> &str;

    /// Send one prompt. Single attempt, no retry.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError>;
}

/// A single-prompt completion request.
#[derive(Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub api_key: String,
    /// Overrides the provider's configured token limit.
    pub max_tokens: Option<u32>,
    /// Leave out configured sampling settings and send the smallest body the
    /// vendor accepts.
    pub bare: bool,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            api_key: api_key.into(),
            max_tokens: None,
            bare: false,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn bare(mut self) -> Self {
        self.bare = true;
        self
    }
}

impl fmt::Debug for CompletionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionRequest")
            .field("prompt", &self.prompt)
            .field("api_key", &"<redacted>")
            .field("max_tokens", &self.max_tokens)
            .field("bare", &self.bare)
            .finish()
    }
}

/// Reply text extracted from a vendor response.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub text: String,
    /// False when the reply could not be located and `text` is the fallback.
    pub extracted: bool,
}

impl CompletionResponse {
    /// Wrap an extracted reply, degrading to the fallback when absent or empty.
    pub fn from_extracted(text: Option<String>) -> Self {
        match text.filter(|t| !t.is_empty()) {
            Some(text) => Self {
                text,
                extracted: true,
            },
            None => Self {
                text: NO_RESPONSE_FALLBACK.to_string(),
                extracted: false,
            },
        }
    }
}

/// Providers a user can pick in the settings UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Gemini,
    Grok,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAI,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::Grok,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
            Self::Grok => "grok",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Claude",
            Self::Gemini => "Gemini",
            Self::Grok => "Grok",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Display name for a stored provider id; `None` for empty or unknown.
    pub fn display_name_for(id: &str) -> &'static str {
        Self::from_id(id).map_or("None", |kind| kind.display_name())
    }
}
