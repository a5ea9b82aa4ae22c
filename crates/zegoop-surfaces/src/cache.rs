//! Per-surface copy of the settings record.

use serde_json::Value;
use tracing::debug;

use zegoop_protocols::store::shallow_merge;
use zegoop_protocols::{Command, CoordinatorClient, Reply, Settings, SettingsMap};

use crate::error::RequestError;

/// A surface's local view of the settings record.
///
/// The copy may go stale; it is refreshed at start-up and whenever a
/// `settingsUpdated` push arrives.
#[derive(Debug, Clone, Default)]
pub struct SettingsCache {
    base: SettingsMap,
    map: SettingsMap,
    settings: Settings,
}

impl SettingsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache whose snapshots are laid over `base`.
    pub fn with_base(base: SettingsMap) -> Self {
        let settings = Settings::from_map(&base);
        Self {
            map: base.clone(),
            base,
            settings,
        }
    }

    /// Fetch a fresh snapshot. On failure the previous copy is kept.
    pub async fn refresh(&mut self, client: &dyn CoordinatorClient) -> Result<(), RequestError> {
        match RequestError::check(client.request(Command::GetSettings).await)? {
            Reply::Settings(snapshot) => {
                debug!("Settings cache refreshed ({} keys)", snapshot.len());
                self.replace(snapshot);
                Ok(())
            }
            _ => Err(RequestError::UnexpectedReply("getSettings")),
        }
    }

    /// Replace the copy with `base` overlaid by `snapshot`.
    pub fn replace(&mut self, snapshot: SettingsMap) {
        let mut map = self.base.clone();
        shallow_merge(&mut map, snapshot);
        self.settings = Settings::from_map(&map);
        self.map = map;
    }

    /// Apply a write locally, with the store's top-level merge rule.
    pub fn merge(&mut self, partial: SettingsMap) {
        shallow_merge(&mut self.map, partial);
        self.settings = Settings::from_map(&self.map);
    }

    /// Apply a single top-level key locally.
    pub fn set(&mut self, key: &str, value: Value) {
        let mut partial = SettingsMap::new();
        partial.insert(key.to_string(), value);
        self.merge(partial);
    }

    pub fn map(&self) -> &SettingsMap {
        &self.map
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
