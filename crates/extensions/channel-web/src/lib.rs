//! # Zegoop Channel - Web
//!
//! WebSocket bridge that lets browser-side surfaces (content script, popup,
//! options page) talk to the coordinator.
//!
//! Each socket registers as one [`Surface`](zegoop_protocols::Surface) in the
//! shared [`SurfaceRegistry`] for as long as it stays open. Frames:
//!
//! - client → `{"type":"request","id":..,"message":<command>}`
//! - client → `{"type":"menu","itemId":"ai-explain","selectionText":".."}`
//! - server → `{"type":"response","id":..,"message":<reply>}`
//! - server → `{"type":"push","message":<notification>}`
//!
//! ## Usage
//!
//! ```ignore
//! let channel = WebChannel::new(WebChannelConfig::default(), handle, surfaces);
//! let addr = channel.start().await?;
//! ```

mod connection;
mod error;
mod frame;
mod server;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use zegoop_core::{CoordinatorHandle, SurfaceRegistry};

pub use connection::WebSurface;
pub use error::ChannelError;
pub use frame::{ClientFrame, ServerFrame};
pub use server::create_router;

/// Web channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebChannelConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on. `0` picks a free port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8765
}

impl Default for WebChannelConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// State shared by the HTTP handlers and every connection task.
pub struct WebChannelState {
    pub coordinator: CoordinatorHandle,
    pub surfaces: Arc<SurfaceRegistry>,
    /// Open sockets, keyed by surface id.
    pub connections: DashMap<String, Arc<WebSurface>>,
    pub started: AtomicBool,
}

impl WebChannelState {
    pub fn new(coordinator: CoordinatorHandle, surfaces: Arc<SurfaceRegistry>) -> Self {
        Self {
            coordinator,
            surfaces,
            connections: DashMap::new(),
            started: AtomicBool::new(false),
        }
    }
}

/// HTTP/WebSocket listener for browser surfaces.
pub struct WebChannel {
    config: WebChannelConfig,
    state: Arc<WebChannelState>,
}

impl WebChannel {
    pub fn new(
        config: WebChannelConfig,
        coordinator: CoordinatorHandle,
        surfaces: Arc<SurfaceRegistry>,
    ) -> Self {
        Self {
            config,
            state: Arc::new(WebChannelState::new(coordinator, surfaces)),
        }
    }

    /// The configured listen address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    pub fn state(&self) -> Arc<WebChannelState> {
        self.state.clone()
    }

    pub fn is_started(&self) -> bool {
        self.state.started.load(Ordering::SeqCst)
    }

    pub fn connection_count(&self) -> usize {
        self.state.connections.len()
    }

    /// Bind and serve in a background task. Returns the bound address.
    pub async fn start(&self) -> Result<SocketAddr, ChannelError> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| ChannelError::ConnectionFailed(format!("Invalid address: {}", e)))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ChannelError::ConnectionFailed(format!("Failed to bind: {}", e)))?;
        let bound = listener
            .local_addr()
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

        let router = create_router(self.state.clone());
        self.state.started.store(true, Ordering::SeqCst);
        info!("Web channel listening on ws://{}/ws", bound);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(bound)
    }

    /// Mark every open socket closed and drop it from the registry.
    pub async fn stop(&self) {
        if !self.is_started() {
            return;
        }
        self.state.started.store(false, Ordering::SeqCst);

        for entry in self.state.connections.iter() {
            entry.value().close();
            let _ = self.state.surfaces.unregister(entry.key());
        }
        self.state.connections.clear();
        debug!("Web channel stopped");
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
