//! Errors seen by a surface when talking to the coordinator.

use thiserror::Error;

use zegoop_protocols::{Reply, SurfaceError};

#[derive(Debug, Error)]
pub enum RequestError {
    /// The command never got an answer.
    #[error(transparent)]
    Transport(#[from] SurfaceError),

    /// The coordinator answered with `{error}`.
    #[error("{0}")]
    Rejected(String),

    /// The coordinator answered with a shape this command does not produce.
    #[error("Unexpected reply to {0}")]
    UnexpectedReply(&'static str),
}

impl RequestError {
    /// Turn an `{error}` reply into an error, pass every other reply through.
    pub fn check(result: Result<Reply, SurfaceError>) -> Result<Reply, Self> {
        match result? {
            Reply::Error { error } => Err(Self::Rejected(error)),
            reply => Ok(reply),
        }
    }
}
