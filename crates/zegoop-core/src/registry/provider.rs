//! The LLM gateway: provider id to vendor adapter.

use std::sync::Arc;

use tracing::{debug, warn};

use zegoop_protocols::{
    CompletionRequest, CompletionResponse, ExtensionError, LLMProvider, ProviderError,
};

use super::base::{BaseRegistry, Registerable};

struct ProviderWrapper(Arc<dyn LLMProvider>);

impl Registerable for ProviderWrapper {
    fn registry_id(&self) -> &str {
        self.0.id()
    }
}

/// Registry of vendor adapters keyed by provider id.
///
/// A provider id without an adapter (`grok`) is selectable in settings but
/// every call for it fails with [`ProviderError::Unsupported`].
pub struct ProviderRegistry {
    inner: BaseRegistry<ProviderWrapper>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            inner: BaseRegistry::new(),
        }
    }

    pub fn register(&self, provider: Arc<dyn LLMProvider>) -> Result<(), ExtensionError> {
        self.inner.register(Arc::new(ProviderWrapper(provider)))
    }

    pub fn unregister(&self, id: &str) -> Result<(), ExtensionError> {
        self.inner.unregister(id)
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn LLMProvider>> {
        self.inner.get(id).map(|wrapper| wrapper.0.clone())
    }

    /// Whether `id` has a gateway mapping.
    pub fn supports(&self, id: &str) -> bool {
        self.inner.contains(id)
    }

    pub fn list_ids(&self) -> Vec<String> {
        self.inner.list_ids()
    }

    /// Send one prompt through the named provider.
    pub async fn call(
        &self,
        provider_id: &str,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let provider = self
            .get(provider_id)
            .ok_or_else(|| ProviderError::Unsupported(provider_id.to_string()))?;

        debug!("Calling provider {} (model {})", provider_id, provider.model());
        let response = provider.complete(request).await?;
        if !response.extracted {
            warn!(
                "Provider {} returned an unexpected response shape, using fallback text",
                provider_id
            );
        }
        Ok(response)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
