//! WebSocket frames.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use zegoop_protocols::{Command, Notification, Reply};

use crate::error::ChannelError;

/// A frame sent by a browser surface.
///
/// `message` stays raw until the frame is dispatched so a command with an
/// unknown action can still be answered under its request id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientFrame {
    Request {
        id: Value,
        message: Value,
    },
    #[serde(rename_all = "camelCase")]
    Menu {
        item_id: String,
        #[serde(default)]
        selection_text: Option<String>,
    },
}

impl ClientFrame {
    pub fn parse(text: &str) -> Result<Self, ChannelError> {
        serde_json::from_str(text).map_err(|e| ChannelError::MalformedFrame(e.to_string()))
    }
}

/// Decode the command carried by a request frame.
pub fn decode_command(message: Value) -> Result<Command, ChannelError> {
    serde_json::from_value(message).map_err(|e| ChannelError::MalformedFrame(e.to_string()))
}

/// A frame sent to a browser surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerFrame {
    Response { id: Value, message: Reply },
    Push { message: Notification },
}

impl ServerFrame {
    pub fn to_text(&self) -> String {
        // Every field is plain JSON data, so serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_request() {
        let frame = ClientFrame::parse(
            r#"{"type":"request","id":7,"message":{"action":"getSettings"}}"#,
        )
        .unwrap();
        match frame {
            ClientFrame::Request { id, message } => {
                assert_eq!(id, json!(7));
                assert_eq!(decode_command(message).unwrap(), Command::GetSettings);
            }
            other => panic!("unexpected frame {:?}", other),
        }
    }

    #[test]
    fn test_parse_menu() {
        let frame = ClientFrame::parse(
            r#"{"type":"menu","itemId":"ai-explain","selectionText":"entropy"}"#,
        )
        .unwrap();
        assert_eq!(
            frame,
            ClientFrame::Menu {
                item_id: "ai-explain".to_string(),
                selection_text: Some("entropy".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert!(ClientFrame::parse("not json").is_err());
        assert!(ClientFrame::parse(r#"{"type":"hello"}"#).is_err());
    }

    #[test]
    fn test_unknown_action_is_malformed() {
        let result = decode_command(json!({ "action": "summarize" }));
        assert!(matches!(result, Err(ChannelError::MalformedFrame(_))));
    }

    #[test]
    fn test_server_frames() {
        let response = ServerFrame::Response {
            id: json!("abc"),
            message: Reply::ack(),
        };
        assert_eq!(
            serde_json::from_str::<Value>(&response.to_text()).unwrap(),
            json!({ "type": "response", "id": "abc", "message": { "success": true } })
        );

        let push = ServerFrame::Push {
            message: Notification::SettingsUpdated,
        };
        assert_eq!(
            serde_json::from_str::<Value>(&push.to_text()).unwrap(),
            json!({ "type": "push", "message": { "action": "settingsUpdated" } })
        );
    }
}
