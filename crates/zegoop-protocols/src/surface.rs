//! Surface protocol definitions.
//!
//! A surface is an independently running UI context (content overlay,
//! toolbar popup, options page, CLI console). Surfaces never share memory
//! with the coordinator: they send [`Command`]s through a
//! [`CoordinatorClient`] and receive [`Notification`]s through
//! [`Surface::deliver`].

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SurfaceError;
use crate::message::{Command, Notification, Reply};

/// Surface unique identifier type.
pub type SurfaceId = String;

/// The kind of UI context behind a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Content,
    Popup,
    Options,
    Console,
}

impl SurfaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Popup => "popup",
            Self::Options => "options",
            Self::Console => "console",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "content" => Some(Self::Content),
            "popup" => Some(Self::Popup),
            "options" => Some(Self::Options),
            "console" => Some(Self::Console),
            _ => None,
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A live surface that can receive pushes.
#[async_trait]
pub trait Surface: Send + Sync {
    /// Returns the surface ID.
    fn id(&self) -> &SurfaceId;

    /// Returns the surface kind.
    fn kind(&self) -> SurfaceKind;

    /// Deliver a push. Fails when the surface has no listener.
    async fn deliver(&self, notification: Notification) -> Result<(), SurfaceError>;
}

/// Request side of the cross-surface channel.
#[async_trait]
pub trait CoordinatorClient: Send + Sync {
    /// Send a command and wait for its reply.
    async fn request(&self, command: Command) -> Result<Reply, SurfaceError>;
}
