//! Cross-surface message contract.
//!
//! Field names match the JSON payloads exchanged with browser-side
//! surfaces: every command and push carries an `action` tag, replies are
//! untagged.

use serde::{Deserialize, Serialize};

use crate::request::RequestType;
use crate::settings::SettingsMap;

/// A request from a surface to the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Command {
    ProcessText {
        text: String,
        #[serde(rename = "type")]
        request_type: RequestType,
    },
    GetSettings,
    UpdateSettings {
        settings: SettingsMap,
    },
    ToggleMode,
    #[serde(rename_all = "camelCase")]
    TestProvider {
        provider: String,
        api_key: String,
    },
}

impl Command {
    /// The wire name of the command, for logging.
    pub fn action(&self) -> &'static str {
        match self {
            Self::ProcessText { .. } => "processText",
            Self::GetSettings => "getSettings",
            Self::UpdateSettings { .. } => "updateSettings",
            Self::ToggleMode => "toggleMode",
            Self::TestProvider { .. } => "testProvider",
        }
    }
}

/// The coordinator's answer to exactly one [`Command`].
///
/// Variant order matters for untagged decoding: the most specific shapes
/// come first and a bare settings object last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Error {
        error: String,
    },
    Completion {
        success: bool,
        response: String,
    },
    #[serde(rename_all = "camelCase")]
    Mode {
        success: bool,
        ai_mode: bool,
    },
    Ack {
        success: bool,
    },
    Settings(SettingsMap),
}

impl Reply {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn completion(response: impl Into<String>) -> Self {
        Self::Completion {
            success: true,
            response: response.into(),
        }
    }

    pub fn ack() -> Self {
        Self::Ack { success: true }
    }

    pub fn mode(ai_mode: bool) -> Self {
        Self::Mode {
            success: true,
            ai_mode,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { error } => Some(error),
            _ => None,
        }
    }
}

/// A push from the coordinator to a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Notification {
    #[serde(rename_all = "camelCase")]
    ToggleMode { ai_mode: bool },
    #[serde(rename = "showAIResponse", rename_all = "camelCase")]
    ShowAiResponse {
        response: String,
        original_text: String,
        #[serde(rename = "type")]
        request_type: RequestType,
    },
    ShowError { error: String },
    SettingsUpdated,
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
