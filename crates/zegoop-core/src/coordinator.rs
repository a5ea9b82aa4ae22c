//! The mode/request coordinator.
//!
//! The only component that touches the settings store on behalf of
//! surfaces and the only one that talks to providers. Every command is
//! answered, and every failure becomes an `{error}` reply.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use zegoop_protocols::settings::keys;
use zegoop_protocols::{
    Command, CompletionRequest, Notification, ProviderError, Reply, RequestType, Settings,
    SettingsMap, SettingsStore, SurfaceId,
};

use crate::error::CoordinatorError;
use crate::menu::MenuItem;
use crate::prompt::{build_prompt, TEST_MAX_TOKENS, TEST_PROMPT};
use crate::registry::{ProviderRegistry, SurfaceRegistry};

/// Global AI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Off,
    On,
}

impl Mode {
    pub fn from_flag(ai_mode: bool) -> Self {
        if ai_mode { Self::On } else { Self::Off }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    pub fn flipped(&self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }
}

pub struct Coordinator {
    store: Arc<dyn SettingsStore>,
    providers: Arc<ProviderRegistry>,
    surfaces: Arc<SurfaceRegistry>,
    mode: RwLock<Mode>,
}

impl Coordinator {
    pub fn new(
        store: Arc<dyn SettingsStore>,
        providers: Arc<ProviderRegistry>,
        surfaces: Arc<SurfaceRegistry>,
    ) -> Self {
        Self {
            store,
            providers,
            surfaces,
            mode: RwLock::new(Mode::Off),
        }
    }

    pub fn providers(&self) -> &Arc<ProviderRegistry> {
        &self.providers
    }

    pub fn surfaces(&self) -> &Arc<SurfaceRegistry> {
        &self.surfaces
    }

    /// The last known mode.
    pub fn mode(&self) -> Mode {
        *self.mode.read()
    }

    /// Write install defaults when the store is empty.
    ///
    /// Returns true when this was a first install.
    pub async fn on_installed(&self) -> Result<bool, CoordinatorError> {
        let existing = self.store.get(None).await?;
        if !existing.is_empty() {
            debug!("Settings already present in store {}", self.store.id());
            return Ok(false);
        }

        self.store.set(Settings::install_defaults().to_map()).await?;
        info!("Wrote install defaults to store {}", self.store.id());
        Ok(true)
    }

    /// Load the mode from the store. Absent means off.
    pub async fn load_mode(&self) -> Result<Mode, CoordinatorError> {
        let snapshot = self.store.get(Some(&[keys::AI_MODE][..])).await?;
        let mode = Mode::from_flag(Settings::from_map(&snapshot).ai_mode);
        *self.mode.write() = mode;
        info!("AI mode loaded: {:?}", mode);
        Ok(mode)
    }

    /// Answer one command from `origin`.
    pub async fn handle(&self, origin: Option<&str>, command: Command) -> Reply {
        debug!(
            "Handling {} from {}",
            command.action(),
            origin.unwrap_or("<local>")
        );

        let result = match command {
            Command::ProcessText { text, request_type } => self
                .process_text(&text, &request_type)
                .await
                .map(Reply::completion),
            Command::GetSettings => self.settings().await.map(Reply::Settings),
            Command::UpdateSettings { settings } => self
                .update_settings(origin, settings)
                .await
                .map(|()| Reply::ack()),
            Command::ToggleMode => self.toggle_mode(origin).await.map(Reply::mode),
            Command::TestProvider { provider, api_key } => self
                .test_provider(&provider, &api_key)
                .await
                .map(Reply::completion),
        };

        result.unwrap_or_else(|e| {
            if matches!(e, CoordinatorError::Storage(_)) {
                error!("Store failure: {}", e);
            } else {
                debug!("Command failed: {}", e);
            }
            Reply::error(e.to_string())
        })
    }

    /// Build the prompt for `text` and send it to the selected provider.
    pub async fn process_text(
        &self,
        text: &str,
        request_type: &RequestType,
    ) -> Result<String, CoordinatorError> {
        let settings = Settings::from_map(&self.store.get(None).await?);

        let provider = settings
            .provider()
            .ok_or(CoordinatorError::NoProviderSelected)?;
        let api_key = settings
            .api_key_for(provider)
            .ok_or_else(|| CoordinatorError::NoCredential(provider.to_string()))?;

        let prompt = build_prompt(text, request_type, &settings.system_prompts);
        let response = self
            .providers
            .call(provider, CompletionRequest::new(prompt, api_key))
            .await?;
        Ok(response.text)
    }

    /// The whole settings record.
    pub async fn settings(&self) -> Result<SettingsMap, CoordinatorError> {
        Ok(self.store.get(None).await?)
    }

    /// Shallow-merge `partial` into the store and tell every other surface.
    ///
    /// A non-empty `selectedLLM` must have a gateway mapping.
    pub async fn update_settings(
        &self,
        origin: Option<&str>,
        partial: SettingsMap,
    ) -> Result<(), CoordinatorError> {
        if let Some(Value::String(provider)) = partial.get(keys::SELECTED_LLM) {
            if !provider.is_empty() && !self.providers.supports(provider) {
                return Err(ProviderError::Unsupported(provider.clone()).into());
            }
        }
        let ai_mode = partial.get(keys::AI_MODE).and_then(Value::as_bool);

        self.store.set(partial).await?;

        if let Some(ai_mode) = ai_mode {
            *self.mode.write() = Mode::from_flag(ai_mode);
        }

        let delivered = self
            .surfaces
            .broadcast(&Notification::SettingsUpdated, origin)
            .await;
        debug!("settingsUpdated delivered to {} surface(s)", delivered);
        Ok(())
    }

    /// Flip and persist the mode, then tell every surface except `origin`.
    pub async fn toggle_mode(&self, origin: Option<&str>) -> Result<bool, CoordinatorError> {
        let snapshot = self.store.get(Some(&[keys::AI_MODE][..])).await?;
        let mode = Mode::from_flag(Settings::from_map(&snapshot).ai_mode).flipped();

        let mut partial = SettingsMap::new();
        partial.insert(keys::AI_MODE.to_string(), Value::Bool(mode.is_on()));
        self.store.set(partial).await?;
        *self.mode.write() = mode;
        info!("AI mode toggled: {:?}", mode);

        self.surfaces
            .broadcast(
                &Notification::ToggleMode {
                    ai_mode: mode.is_on(),
                },
                origin,
            )
            .await;
        Ok(mode.is_on())
    }

    /// One short call with caller-supplied credentials.
    pub async fn test_provider(
        &self,
        provider: &str,
        api_key: &str,
    ) -> Result<String, CoordinatorError> {
        if provider.is_empty() {
            return Err(CoordinatorError::NoProviderSelected);
        }
        if api_key.is_empty() {
            return Err(CoordinatorError::NoCredential(provider.to_string()));
        }

        let request = CompletionRequest::new(TEST_PROMPT, api_key)
            .with_max_tokens(TEST_MAX_TOKENS)
            .bare();
        let response = self.providers.call(provider, request).await?;
        Ok(response.text)
    }

    /// Run a context-menu action for `tab` and push the outcome to it.
    pub async fn on_context_menu(
        &self,
        tab: &SurfaceId,
        item: MenuItem,
        selection: Option<String>,
    ) {
        let notification = match item {
            MenuItem::Explain | MenuItem::Simplify => {
                let request_type = if item == MenuItem::Explain {
                    RequestType::Explain
                } else {
                    RequestType::Simplify
                };
                let text = selection.unwrap_or_default();
                match self.process_text(&text, &request_type).await {
                    Ok(response) => Notification::ShowAiResponse {
                        response,
                        original_text: text,
                        request_type,
                    },
                    Err(e) => Notification::ShowError {
                        error: e.to_string(),
                    },
                }
            }
            MenuItem::ToggleMode => match self.toggle_mode(None).await {
                // The broadcast already reached the tab.
                Ok(_) => return,
                Err(e) => Notification::ShowError {
                    error: e.to_string(),
                },
            },
        };

        if let Err(e) = self.surfaces.send_to(tab, notification).await {
            warn!("Could not deliver {} result to {}: {}", item.id(), tab, e);
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
