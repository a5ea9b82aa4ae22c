//! Provider registration for Zegoop.

use std::sync::Arc;

use tracing::{info, warn};

use zegoop_config::{Config, ProviderConfig};
use zegoop_core::ProviderRegistry;
use zegoop_protocols::LLMProvider;
use zegoop_provider_anthropic::AnthropicProvider;
use zegoop_provider_gemini::GeminiProvider;
use zegoop_provider_openai::OpenAIProvider;

/// Register every vendor adapter with its config overrides.
///
/// Keys are not part of the config: they come from the settings record on
/// each call.
pub(crate) fn register_providers(registry: &ProviderRegistry, config: &Config) {
    register(registry, "OpenAI", Arc::new(openai(&config.provider("openai"))));
    register(
        registry,
        "Anthropic",
        Arc::new(anthropic(&config.provider("anthropic"))),
    );
    register(registry, "Gemini", Arc::new(gemini(&config.provider("gemini"))));

    for id in config.providers.keys() {
        if !registry.supports(id) {
            warn!("Unknown provider type in config: '{}', skipping", id);
        }
    }
}

fn register(registry: &ProviderRegistry, name: &str, provider: Arc<dyn LLMProvider>) {
    if let Err(e) = registry.register(provider) {
        warn!("Failed to register {} provider: {}", name, e);
    } else {
        info!("Registered {} provider", name);
    }
}

fn openai(overrides: &ProviderConfig) -> OpenAIProvider {
    let mut provider = OpenAIProvider::new();
    if let Some(ref url) = overrides.base_url {
        provider = provider.with_url(url.clone());
    }
    if let Some(ref model) = overrides.model {
        provider = provider.with_model(model.clone());
    }
    if let Some(max_tokens) = overrides.max_tokens {
        provider = provider.with_max_tokens(max_tokens);
    }
    if let Some(temperature) = overrides.temperature {
        provider = provider.with_temperature(temperature);
    }
    provider
}

fn anthropic(overrides: &ProviderConfig) -> AnthropicProvider {
    let mut provider = AnthropicProvider::new();
    if let Some(ref url) = overrides.base_url {
        provider = provider.with_url(url.clone());
    }
    if let Some(ref model) = overrides.model {
        provider = provider.with_model(model.clone());
    }
    if let Some(max_tokens) = overrides.max_tokens {
        provider = provider.with_max_tokens(max_tokens);
    }
    if let Some(temperature) = overrides.temperature {
        provider = provider.with_temperature(temperature);
    }
    provider
}

fn gemini(overrides: &ProviderConfig) -> GeminiProvider {
    let mut provider = GeminiProvider::new();
    if let Some(ref url) = overrides.base_url {
        provider = provider.with_url(url.clone());
    }
    if let Some(ref model) = overrides.model {
        provider = provider.with_model(model.clone());
    }
    if let Some(max_tokens) = overrides.max_tokens {
        provider = provider.with_max_tokens(max_tokens);
    }
    if let Some(temperature) = overrides.temperature {
        provider = provider.with_temperature(temperature);
    }
    provider
}
