//! The options page.
//!
//! The page works on factory defaults overlaid with the stored record, so
//! every nested object it writes back is complete. Saving sends the whole
//! merged record; single-field edits read the nested object from the cache
//! and send it back in full.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use zegoop_protocols::store::shallow_merge;
use zegoop_protocols::{
    Command, CoordinatorClient, Notification, ProviderKind, Reply, Settings, SettingsMap,
    SystemPrompts,
};

use crate::cache::SettingsCache;
use crate::error::RequestError;
use crate::view::View;

const MAILBOX_CAPACITY: usize = 16;

pub const MISSING_CREDENTIALS: &str = "Please select a provider and enter an API key first.";

/// The editable fields of the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionsForm {
    pub selected_llm: String,
    /// Raw key inputs by provider id.
    pub api_keys: BTreeMap<String, String>,
    pub auto_mode: bool,
    pub show_tooltips: bool,
    pub show_indicator: bool,
    pub modal_position: String,
    pub response_length: String,
    pub toggle_shortcut: String,
    pub analytics_opt_out: bool,
    pub system_prompts: SystemPrompts,
}

impl OptionsForm {
    /// Fill the form from a settings record.
    pub fn from_settings(settings: &Settings) -> Self {
        let behavior = &settings.settings;
        let prompts = &settings.system_prompts;
        let prompt = |value: &Option<String>| Some(value.clone().unwrap_or_default());

        Self {
            selected_llm: settings.selected_llm.clone(),
            api_keys: settings.api_keys.clone(),
            auto_mode: behavior.auto_mode.unwrap_or(false),
            show_tooltips: behavior.show_tooltips.unwrap_or(true),
            show_indicator: behavior.show_indicator.unwrap_or(false),
            modal_position: behavior
                .modal_position
                .clone()
                .unwrap_or_else(|| "center".to_string()),
            response_length: behavior
                .response_length
                .clone()
                .unwrap_or_else(|| "medium".to_string()),
            toggle_shortcut: settings
                .shortcuts
                .toggle_mode
                .clone()
                .unwrap_or_else(|| "Alt+A".to_string()),
            analytics_opt_out: settings
                .privacy
                .as_ref()
                .is_some_and(|p| p.analytics_opt_out),
            system_prompts: SystemPrompts {
                global: prompt(&prompts.global),
                explain: prompt(&prompts.explain),
                simplify: prompt(&prompts.simplify),
                define: prompt(&prompts.define),
                tooltip: prompt(&prompts.tooltip),
            },
        }
    }

    /// The settings keys this form writes.
    ///
    /// Prompts and keys are trimmed; providers with an empty key are left
    /// out of `apiKeys`.
    pub fn collect(&self) -> SettingsMap {
        let api_keys: serde_json::Map<String, Value> = ProviderKind::ALL
            .iter()
            .filter_map(|kind| {
                let key = self.api_keys.get(kind.id())?.trim();
                (!key.is_empty()).then(|| (kind.id().to_string(), Value::String(key.to_string())))
            })
            .collect();
        let prompt = |value: &Option<String>| value.as_deref().unwrap_or_default().trim().to_string();
        let prompts = &self.system_prompts;

        let collected = json!({
            "selectedLLM": self.selected_llm,
            "apiKeys": api_keys,
            "settings": {
                "autoMode": self.auto_mode,
                "showTooltips": self.show_tooltips,
                "showIndicator": self.show_indicator,
                "modalPosition": self.modal_position,
                "responseLength": self.response_length,
            },
            "shortcuts": { "toggleMode": self.toggle_shortcut },
            "privacy": { "analyticsOptOut": self.analytics_opt_out },
            "systemPrompts": {
                "global": prompt(&prompts.global),
                "explain": prompt(&prompts.explain),
                "simplify": prompt(&prompts.simplify),
                "define": prompt(&prompts.define),
                "tooltip": prompt(&prompts.tooltip),
            },
        });

        match collected {
            Value::Object(map) => map,
            _ => SettingsMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionsEvent {
    /// The save button.
    Save(OptionsForm),
    /// An input changed; saved without a success toast.
    AutoSave(OptionsForm),
    Reset,
    TestConnection(OptionsForm),
    Push(Notification),
}

impl From<Notification> for OptionsEvent {
    fn from(notification: Notification) -> Self {
        Self::Push(notification)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionsUpdate {
    Form(OptionsForm),
    Toast { kind: ToastKind, message: String },
    Testing,
    TestResult { kind: ToastKind, message: String },
}

pub struct OptionsController {
    client: Arc<dyn CoordinatorClient>,
    view: Arc<dyn View<OptionsUpdate>>,
    mailbox: mpsc::Sender<OptionsEvent>,
    cache: SettingsCache,
}

impl OptionsController {
    pub fn new(
        client: Arc<dyn CoordinatorClient>,
        view: Arc<dyn View<OptionsUpdate>>,
    ) -> (Self, mpsc::Receiver<OptionsEvent>) {
        let (mailbox, rx) = mpsc::channel(MAILBOX_CAPACITY);
        let controller = Self {
            client,
            view,
            mailbox,
            cache: SettingsCache::with_base(Settings::factory_defaults().to_map()),
        };
        (controller, rx)
    }

    pub fn sender(&self) -> mpsc::Sender<OptionsEvent> {
        self.mailbox.clone()
    }

    /// The merged record the page works on.
    pub fn settings_map(&self) -> &SettingsMap {
        self.cache.map()
    }

    pub fn form(&self) -> OptionsForm {
        OptionsForm::from_settings(self.cache.settings())
    }

    pub async fn init(&mut self) {
        self.reload().await;
    }

    pub async fn run(mut self, mut rx: mpsc::Receiver<OptionsEvent>) {
        self.init().await;
        while let Some(event) = rx.recv().await {
            self.dispatch(event).await;
        }
    }

    pub fn spawn(self, rx: mpsc::Receiver<OptionsEvent>) -> JoinHandle<()> {
        tokio::spawn(self.run(rx))
    }

    pub async fn dispatch(&mut self, event: OptionsEvent) {
        let result = match event {
            OptionsEvent::Save(form) => self.save(&form, true).await,
            OptionsEvent::AutoSave(form) => self.save(&form, false).await,
            OptionsEvent::Reset => self.reset().await,
            OptionsEvent::TestConnection(form) => self.test_connection(&form).await.map(|_| ()),
            OptionsEvent::Push(Notification::SettingsUpdated) => {
                self.reload().await;
                Ok(())
            }
            OptionsEvent::Push(other) => {
                debug!("Options page ignores {:?}", other);
                Ok(())
            }
        };
        if let Err(e) = result {
            debug!("Options action failed: {}", e);
        }
    }

    /// Merge the form over the cached record and store the result.
    pub async fn save(&mut self, form: &OptionsForm, toast: bool) -> Result<(), RequestError> {
        let mut updated = self.cache.map().clone();
        shallow_merge(&mut updated, form.collect());

        match self.write(updated.clone()).await {
            Ok(()) => {
                self.cache.replace(updated);
                if toast {
                    self.toast(ToastKind::Success, "Settings saved successfully!".to_string());
                }
                Ok(())
            }
            Err(e) => {
                warn!("Failed to save settings: {}", e);
                self.toast(ToastKind::Error, format!("Failed to save settings: {}", e));
                Err(e)
            }
        }
    }

    /// Overwrite the record with factory defaults.
    pub async fn reset(&mut self) -> Result<(), RequestError> {
        let defaults = Settings::factory_defaults().to_map();
        match self.write(defaults.clone()).await {
            Ok(()) => {
                info!("Settings reset to factory defaults");
                self.cache.replace(defaults);
                self.view.render(OptionsUpdate::Form(self.form()));
                self.toast(ToastKind::Success, "Settings reset to defaults.".to_string());
                Ok(())
            }
            Err(e) => {
                warn!("Failed to reset settings: {}", e);
                self.toast(
                    ToastKind::Error,
                    "Failed to reset settings. Please try again.".to_string(),
                );
                Err(e)
            }
        }
    }

    /// Set one value. `path` is a top-level key or `key.field` for a field
    /// of a nested object; the rest of that object is taken from the cache.
    pub async fn set_value(&mut self, path: &str, value: Value) -> Result<(), RequestError> {
        let (key, value) = match path.split_once('.') {
            None => (path, value),
            Some((key, field)) => {
                let mut object = match self.cache.map().get(key) {
                    Some(Value::Object(object)) => object.clone(),
                    _ => serde_json::Map::new(),
                };
                object.insert(field.to_string(), value);
                (key, Value::Object(object))
            }
        };

        let mut partial = SettingsMap::new();
        partial.insert(key.to_string(), value);
        self.write(partial.clone()).await?;
        self.cache.merge(partial);
        Ok(())
    }

    /// Make one short call with the provider and key in `form`.
    pub async fn test_connection(&self, form: &OptionsForm) -> Result<String, RequestError> {
        let provider = form.selected_llm.trim();
        let api_key = form
            .api_keys
            .get(provider)
            .map(|key| key.trim())
            .unwrap_or_default();

        if provider.is_empty() || api_key.is_empty() {
            self.test_result(ToastKind::Error, MISSING_CREDENTIALS.to_string());
            return Err(RequestError::Rejected(MISSING_CREDENTIALS.to_string()));
        }

        self.view.render(OptionsUpdate::Testing);
        let command = Command::TestProvider {
            provider: provider.to_string(),
            api_key: api_key.to_string(),
        };
        match RequestError::check(self.client.request(command).await) {
            Ok(Reply::Completion { response, .. }) => {
                self.test_result(ToastKind::Success, "API connection successful!".to_string());
                Ok(response)
            }
            Ok(_) => {
                let err = RequestError::UnexpectedReply("testProvider");
                self.test_result(ToastKind::Error, format!("API test failed: {}", err));
                Err(err)
            }
            Err(RequestError::Rejected(error)) => {
                self.test_result(ToastKind::Error, format!("API test failed: {}", error));
                Err(RequestError::Rejected(error))
            }
            Err(e) => {
                self.test_result(ToastKind::Error, format!("Connection failed: {}", e));
                Err(e)
            }
        }
    }

    async fn write(&self, settings: SettingsMap) -> Result<(), RequestError> {
        let result = self
            .client
            .request(Command::UpdateSettings { settings })
            .await;
        match RequestError::check(result)? {
            Reply::Ack { .. } => Ok(()),
            _ => Err(RequestError::UnexpectedReply("updateSettings")),
        }
    }

    async fn reload(&mut self) {
        if let Err(e) = self.cache.refresh(self.client.as_ref()).await {
            warn!("Failed to load settings, showing defaults: {}", e);
        }
        self.view.render(OptionsUpdate::Form(self.form()));
    }

    fn toast(&self, kind: ToastKind, message: String) {
        self.view.render(OptionsUpdate::Toast { kind, message });
    }

    fn test_result(&self, kind: ToastKind, message: String) {
        self.view.render(OptionsUpdate::TestResult { kind, message });
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
