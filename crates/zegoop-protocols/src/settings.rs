//! The persisted settings record.
//!
//! The store itself is untyped ([`SettingsMap`]) so that partial writes keep
//! their exact shape. [`Settings`] is the typed read view every surface and
//! the coordinator decode from a snapshot.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::request::RequestType;

/// Raw top-level key/value view of the settings record.
pub type SettingsMap = serde_json::Map<String, Value>;

/// Top-level keys of the settings record.
pub mod keys {
    pub const AI_MODE: &str = "aiMode";
    pub const SELECTED_LLM: &str = "selectedLLM";
    pub const API_KEYS: &str = "apiKeys";
    pub const SHORTCUTS: &str = "shortcuts";
    pub const SETTINGS: &str = "settings";
    pub const SYSTEM_PROMPTS: &str = "systemPrompts";
    pub const INDICATOR_POSITION: &str = "indicatorPosition";
    pub const PRIVACY: &str = "privacy";
}

const DEFAULT_TOGGLE_SHORTCUT: &str = "Alt+A";
const DEFAULT_TOOLTIP_PROMPT: &str =
    "Provide brief, single-sentence definitions. Keep responses under 20 words.";

/// Typed view of the settings record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub ai_mode: bool,
    /// Active provider id; empty means none selected.
    #[serde(default, rename = "selectedLLM")]
    pub selected_llm: String,
    #[serde(default)]
    pub api_keys: BTreeMap<String, String>,
    #[serde(default)]
    pub shortcuts: Shortcuts,
    #[serde(default)]
    pub settings: BehaviorSettings,
    #[serde(default)]
    pub system_prompts: SystemPrompts,
    #[serde(default)]
    pub indicator_position: Option<IndicatorPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<Privacy>,
}

/// Keybinding descriptors. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortcuts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggle_mode: Option<String>,
}

/// UI and behaviour toggles stored under the nested `settings` key.
///
/// Every field is optional: a writer that replaced the nested object
/// without re-supplying a field leaves it absent, and readers decide what
/// absence means.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_tooltips: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modal_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_indicator: Option<bool>,
}

/// User-supplied prompt prefixes keyed by request type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemPrompts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simplify: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub define: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl SystemPrompts {
    /// All five prompts present and empty.
    pub fn empty() -> Self {
        Self {
            global: Some(String::new()),
            explain: Some(String::new()),
            simplify: Some(String::new()),
            define: Some(String::new()),
            tooltip: Some(String::new()),
        }
    }

    /// The prefix for a request: the per-type prompt if non-empty, else the
    /// global one if non-empty.
    pub fn for_request(&self, request_type: &RequestType) -> Option<&str> {
        let specific = match request_type {
            RequestType::Explain => self.explain.as_deref(),
            RequestType::Simplify => self.simplify.as_deref(),
            RequestType::Define => self.define.as_deref(),
            RequestType::Tooltip => self.tooltip.as_deref(),
            RequestType::Translate | RequestType::Other(_) => None,
        };
        non_empty(specific).or_else(|| non_empty(self.global.as_deref()))
    }
}

/// Last dragged screen position of the floating mode indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPosition {
    pub left: f64,
    pub top: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Privacy {
    #[serde(default)]
    pub analytics_opt_out: bool,
}

impl Settings {
    /// Record written by the coordinator on first install.
    pub fn install_defaults() -> Self {
        Self {
            ai_mode: false,
            selected_llm: "openai".to_string(),
            api_keys: BTreeMap::new(),
            shortcuts: Shortcuts {
                toggle_mode: Some(DEFAULT_TOGGLE_SHORTCUT.to_string()),
            },
            settings: BehaviorSettings {
                auto_mode: Some(false),
                show_tooltips: Some(true),
                modal_position: Some("center".to_string()),
                response_length: None,
                show_indicator: Some(false),
            },
            system_prompts: SystemPrompts {
                tooltip: Some(DEFAULT_TOOLTIP_PROMPT.to_string()),
                ..SystemPrompts::empty()
            },
            indicator_position: None,
            privacy: None,
        }
    }

    /// Record the options page restores on "reset to defaults".
    pub fn factory_defaults() -> Self {
        Self {
            ai_mode: false,
            selected_llm: String::new(),
            api_keys: BTreeMap::new(),
            shortcuts: Shortcuts {
                toggle_mode: Some(DEFAULT_TOGGLE_SHORTCUT.to_string()),
            },
            settings: BehaviorSettings {
                auto_mode: Some(false),
                show_tooltips: Some(true),
                modal_position: Some("center".to_string()),
                response_length: Some("medium".to_string()),
                show_indicator: Some(false),
            },
            system_prompts: SystemPrompts::empty(),
            indicator_position: None,
            privacy: Some(Privacy::default()),
        }
    }

    /// Decode a snapshot key by key.
    ///
    /// A key holding a value of the wrong shape falls back to that key's
    /// default instead of invalidating the whole record.
    pub fn from_map(map: &SettingsMap) -> Self {
        Self {
            ai_mode: field(map, keys::AI_MODE),
            selected_llm: field(map, keys::SELECTED_LLM),
            api_keys: field(map, keys::API_KEYS),
            shortcuts: field(map, keys::SHORTCUTS),
            settings: field(map, keys::SETTINGS),
            system_prompts: field(map, keys::SYSTEM_PROMPTS),
            indicator_position: field(map, keys::INDICATOR_POSITION),
            privacy: field(map, keys::PRIVACY),
        }
    }

    /// Encode as a full top-level map.
    pub fn to_map(&self) -> SettingsMap {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => SettingsMap::new(),
        }
    }

    /// The credential stored for `provider`, ignoring empty strings.
    pub fn api_key_for(&self, provider: &str) -> Option<&str> {
        self.api_keys
            .get(provider)
            .map(String::as_str)
            .filter(|key| !key.is_empty())
    }

    /// The selected provider id, or `None` when nothing is selected.
    pub fn provider(&self) -> Option<&str> {
        Some(self.selected_llm.as_str()).filter(|id| !id.is_empty())
    }
}

fn field<T: DeserializeOwned + Default>(map: &SettingsMap, key: &str) -> T {
    match map.get(key) {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            warn!("Ignoring malformed settings key {}: {}", key, e);
            T::default()
        }),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
