//! One browser surface connected over a WebSocket.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};

use zegoop_core::MenuItem;
use zegoop_protocols::{Notification, Reply, Surface, SurfaceError, SurfaceId, SurfaceKind};

use crate::error::ChannelError;
use crate::frame::{decode_command, ClientFrame, ServerFrame};
use crate::WebChannelState;

const OUTBOUND_CAPACITY: usize = 32;

/// The coordinator-side handle of a connected surface.
pub struct WebSurface {
    id: SurfaceId,
    kind: SurfaceKind,
    tx: mpsc::Sender<String>,
    open: AtomicBool,
}

impl WebSurface {
    /// Register the surface and spawn the task that owns the socket.
    pub fn spawn(
        id: SurfaceId,
        kind: SurfaceKind,
        socket: WebSocket,
        state: Arc<WebChannelState>,
    ) -> Arc<Self> {
        let (tx, rx) = mpsc::channel::<String>(OUTBOUND_CAPACITY);
        let surface = Arc::new(Self {
            id: id.clone(),
            kind,
            tx,
            open: AtomicBool::new(true),
        });

        state.connections.insert(id.clone(), surface.clone());
        if let Err(e) = state.surfaces.register(surface.clone()) {
            warn!("Surface {} already registered: {}", id, e);
        }

        tokio::spawn(handle_connection(surface.clone(), socket, rx, state));
        surface
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    async fn send_frame(&self, frame: &ServerFrame) -> Result<(), SurfaceError> {
        if !self.is_open() {
            return Err(SurfaceError::Disconnected);
        }
        self.tx
            .send(frame.to_text())
            .await
            .map_err(|e| SurfaceError::SendFailed(e.to_string()))
    }

    /// Queue a frame without waiting; a socket that is not draining its
    /// queue loses the frame.
    fn push_frame(&self, frame: &ServerFrame) -> Result<(), SurfaceError> {
        if !self.is_open() {
            return Err(SurfaceError::Disconnected);
        }
        self.tx.try_send(frame.to_text()).map_err(|e| match e {
            TrySendError::Full(_) => {
                SurfaceError::SendFailed(format!("outbound queue of {} is full", self.id))
            }
            TrySendError::Closed(_) => SurfaceError::Disconnected,
        })
    }
}

#[async_trait]
impl Surface for WebSurface {
    fn id(&self) -> &SurfaceId {
        &self.id
    }

    fn kind(&self) -> SurfaceKind {
        self.kind
    }

    async fn deliver(&self, notification: Notification) -> Result<(), SurfaceError> {
        self.push_frame(&ServerFrame::Push {
            message: notification,
        })
    }
}

async fn handle_connection(
    surface: Arc<WebSurface>,
    socket: WebSocket,
    mut outbound_rx: mpsc::Receiver<String>,
    state: Arc<WebChannelState>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    info!("Surface connected: {} ({})", surface.id, surface.kind);

    loop {
        tokio::select! {
            Some(text) = outbound_rx.recv() => {
                if let Err(e) = ws_tx.send(Message::Text(text.into())).await {
                    warn!("Failed to write to {}: {}", surface.id, e);
                    break;
                }
            }

            result = ws_rx.next() => {
                match result {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(e) = handle_text(&surface, text.as_str(), &state).await {
                            warn!("Ignoring frame from {}: {}", surface.id, e);
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Surface disconnected: {}", surface.id);
                        break;
                    }
                    Some(Ok(_)) => {
                        debug!("Ignoring non-text frame from {}", surface.id);
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error from {}: {}", surface.id, e);
                        break;
                    }
                }
            }
        }
    }

    surface.close();
    state.connections.remove(&surface.id);
    let _ = state.surfaces.unregister(&surface.id);
    debug!("Surface removed: {}", surface.id);
}

async fn handle_text(
    surface: &Arc<WebSurface>,
    text: &str,
    state: &Arc<WebChannelState>,
) -> Result<(), ChannelError> {
    match ClientFrame::parse(text)? {
        ClientFrame::Request { id, message } => {
            let command = match decode_command(message) {
                Ok(command) => command,
                Err(e) => {
                    let frame = ServerFrame::Response {
                        id,
                        message: Reply::error(e.to_string()),
                    };
                    if let Err(e) = surface.send_frame(&frame).await {
                        debug!("Error reply to {} dropped: {}", surface.id, e);
                    }
                    return Ok(());
                }
            };

            // Served off the socket loop: requests on one socket are independent.
            let surface = surface.clone();
            let coordinator = state.coordinator.clone();
            tokio::spawn(async move {
                let reply = coordinator
                    .request(Some(surface.id.clone()), command)
                    .await
                    .unwrap_or_else(|e| Reply::error(e.to_string()));
                if let Err(e) = surface.send_frame(&ServerFrame::Response { id, message: reply }).await {
                    debug!("Reply to {} dropped: {}", surface.id, e);
                }
            });
        }
        ClientFrame::Menu {
            item_id,
            selection_text,
        } => {
            let item = MenuItem::from_id(&item_id).ok_or(ChannelError::UnknownMenuItem(item_id))?;
            state
                .coordinator
                .menu_click(surface.id.clone(), item, selection_text)
                .await
                .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;
        }
    }
    Ok(())
}
