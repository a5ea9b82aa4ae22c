//! Web channel errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("Unknown menu item: {0}")]
    UnknownMenuItem(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChannelError::UnknownMenuItem("ai-define".to_string());
        assert_eq!(err.to_string(), "Unknown menu item: ai-define");
    }
}
