//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::loader::ConfigLoader;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub surfaces: SurfacesConfig,

    /// Per-provider overrides keyed by provider id.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    /// Overrides for a provider, or an empty set.
    pub fn provider(&self, id: &str) -> ProviderConfig {
        self.providers.get(id).cloned().unwrap_or_default()
    }
}

/// WebSocket channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8765
}

/// Settings store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl StorageConfig {
    /// The store path with `~` expanded.
    pub fn resolved_path(&self) -> PathBuf {
        PathBuf::from(ConfigLoader::expand_path(&self.path))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> String {
    "~/.zegoop/settings.json".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_dir")]
    pub dir: String,

    /// Write a daily-rotated log file in addition to the console.
    #[serde(default = "default_true")]
    pub file: bool,
}

impl LoggingConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        PathBuf::from(ConfigLoader::expand_path(&self.dir))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: default_log_dir(),
            file: true,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "~/.zegoop/logs".to_string()
}

fn default_true() -> bool {
    true
}

/// Timing of the in-page surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfacesConfig {
    /// Hover time before a tooltip lookup fires.
    #[serde(default = "default_hover_delay")]
    pub hover_delay_ms: u64,

    /// How long a tooltip stays up after its content arrives.
    #[serde(default = "default_tooltip_dismiss")]
    pub tooltip_dismiss_ms: u64,

    /// How long the selection action menu stays open.
    #[serde(default = "default_action_menu_dismiss")]
    pub action_menu_dismiss_ms: u64,
}

impl Default for SurfacesConfig {
    fn default() -> Self {
        Self {
            hover_delay_ms: default_hover_delay(),
            tooltip_dismiss_ms: default_tooltip_dismiss(),
            action_menu_dismiss_ms: default_action_menu_dismiss(),
        }
    }
}

fn default_hover_delay() -> u64 {
    800
}

fn default_tooltip_dismiss() -> u64 {
    5000
}

fn default_action_menu_dismiss() -> u64 {
    10_000
}

/// Provider overrides. Unset fields keep the provider's built-in values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
