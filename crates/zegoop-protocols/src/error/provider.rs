//! LLM gateway errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unsupported LLM provider: {0}")]
    Unsupported(String),

    #[error("API request failed: {status} {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response body: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Build an HTTP error from a non-success status code.
    pub fn from_status(status: u16, reason: Option<&str>) -> Self {
        Self::Http {
            status,
            status_text: reason.unwrap_or_default().to_string(),
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
