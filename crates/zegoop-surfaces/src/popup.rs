//! The toolbar popup: mode switch and provider status.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use zegoop_protocols::{
    keys, Command, CoordinatorClient, Notification, ProviderKind, Reply, Settings, SettingsMap,
};

use crate::cache::SettingsCache;
use crate::error::RequestError;
use crate::view::View;

const MAILBOX_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub enum PopupEvent {
    /// The mode switch was flipped to `ai_mode`.
    SetMode(bool),
    Push(Notification),
}

impl From<Notification> for PopupEvent {
    fn from(notification: Notification) -> Self {
        Self::Push(notification)
    }
}

/// What the popup shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupStatus {
    pub ai_mode: bool,
    pub mode_label: &'static str,
    pub provider_name: &'static str,
    pub api_status: String,
    pub api_ready: bool,
}

impl PopupStatus {
    pub fn from_settings(settings: &Settings) -> Self {
        let provider_name = ProviderKind::display_name_for(&settings.selected_llm);
        let api_ready = settings
            .provider()
            .and_then(|provider| settings.api_key_for(provider))
            .is_some();

        Self {
            ai_mode: settings.ai_mode,
            mode_label: if settings.ai_mode { "AI Mode" } else { "Standard" },
            provider_name,
            api_status: if api_ready {
                format!("{} ready", provider_name)
            } else {
                "No API key configured".to_string()
            },
            api_ready,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupUpdate {
    Status(PopupStatus),
    /// Saving the switch failed; put it back.
    ModeReverted { ai_mode: bool },
}

pub struct PopupController {
    client: Arc<dyn CoordinatorClient>,
    view: Arc<dyn View<PopupUpdate>>,
    mailbox: mpsc::Sender<PopupEvent>,
    cache: SettingsCache,
}

impl PopupController {
    pub fn new(
        client: Arc<dyn CoordinatorClient>,
        view: Arc<dyn View<PopupUpdate>>,
    ) -> (Self, mpsc::Receiver<PopupEvent>) {
        let (mailbox, rx) = mpsc::channel(MAILBOX_CAPACITY);
        let controller = Self {
            client,
            view,
            mailbox,
            cache: SettingsCache::new(),
        };
        (controller, rx)
    }

    pub fn sender(&self) -> mpsc::Sender<PopupEvent> {
        self.mailbox.clone()
    }

    pub fn status(&self) -> PopupStatus {
        PopupStatus::from_settings(self.cache.settings())
    }

    pub async fn init(&mut self) {
        self.reload().await;
    }

    pub async fn run(mut self, mut rx: mpsc::Receiver<PopupEvent>) {
        self.init().await;
        while let Some(event) = rx.recv().await {
            self.dispatch(event).await;
        }
    }

    pub fn spawn(self, rx: mpsc::Receiver<PopupEvent>) -> JoinHandle<()> {
        tokio::spawn(self.run(rx))
    }

    pub async fn dispatch(&mut self, event: PopupEvent) {
        match event {
            PopupEvent::SetMode(ai_mode) => {
                if let Err(e) = self.set_mode(ai_mode).await {
                    warn!("Failed to switch mode: {}", e);
                }
            }
            PopupEvent::Push(Notification::SettingsUpdated) => self.reload().await,
            PopupEvent::Push(Notification::ToggleMode { ai_mode }) => {
                self.cache.set(keys::AI_MODE, Value::Bool(ai_mode));
                self.render_status();
            }
            PopupEvent::Push(other) => debug!("Popup ignores {:?}", other),
        }
    }

    /// Save the mode through `updateSettings`. On failure the switch is
    /// reverted and the cached value left alone.
    pub async fn set_mode(&mut self, ai_mode: bool) -> Result<PopupStatus, RequestError> {
        let mut partial = SettingsMap::new();
        partial.insert(keys::AI_MODE.to_string(), Value::Bool(ai_mode));
        let result = self
            .client
            .request(Command::UpdateSettings { settings: partial })
            .await;

        match RequestError::check(result) {
            Ok(Reply::Ack { .. }) => {
                self.cache.set(keys::AI_MODE, Value::Bool(ai_mode));
                Ok(self.render_status())
            }
            Ok(_) => {
                self.view.render(PopupUpdate::ModeReverted { ai_mode: !ai_mode });
                Err(RequestError::UnexpectedReply("updateSettings"))
            }
            Err(e) => {
                self.view.render(PopupUpdate::ModeReverted { ai_mode: !ai_mode });
                Err(e)
            }
        }
    }

    /// Flip the cached mode.
    pub async fn toggle(&mut self) -> Result<PopupStatus, RequestError> {
        let ai_mode = !self.cache.settings().ai_mode;
        self.set_mode(ai_mode).await
    }

    async fn reload(&mut self) {
        if let Err(e) = self.cache.refresh(self.client.as_ref()).await {
            warn!("Failed to load settings: {}", e);
        }
        self.render_status();
    }

    fn render_status(&self) -> PopupStatus {
        let status = self.status();
        self.view.render(PopupUpdate::Status(status.clone()));
        status
    }
}

#[cfg(test)]
#[path = "popup_tests.rs"]
mod tests;
