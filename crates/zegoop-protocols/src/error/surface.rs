//! Surface delivery and request errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Surface not found: {0}")]
    NotFound(String),

    #[error("Surface disconnected")]
    Disconnected,

    #[error("No listener on surface: {0}")]
    NoListener(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Coordinator unavailable: {0}")]
    CoordinatorUnavailable(String),
}
