//! Coordinator mailbox.
//!
//! Surfaces reach the coordinator only through a [`CoordinatorHandle`].
//! Each envelope is served on its own task, so commands are not ordered
//! relative to each other, and a handler that panics still produces an
//! error reply.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use zegoop_protocols::{Command, CoordinatorClient, Reply, SurfaceError, SurfaceId};

use crate::coordinator::Coordinator;
use crate::menu::MenuItem;

const MAILBOX_CAPACITY: usize = 64;

enum Envelope {
    Command {
        origin: Option<SurfaceId>,
        command: Command,
        reply: oneshot::Sender<Reply>,
    },
    Menu {
        tab: SurfaceId,
        item: MenuItem,
        selection: Option<String>,
    },
}

/// Owns the receiving end of the mailbox.
pub struct CoordinatorService {
    coordinator: Arc<Coordinator>,
    rx: mpsc::Receiver<Envelope>,
}

impl CoordinatorService {
    pub fn new(coordinator: Arc<Coordinator>) -> (Self, CoordinatorHandle) {
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        (Self { coordinator, rx }, CoordinatorHandle { tx })
    }

    /// Serve envelopes until every handle is dropped.
    pub async fn run(mut self) {
        info!("Coordinator service started");
        while let Some(envelope) = self.rx.recv().await {
            let coordinator = self.coordinator.clone();
            tokio::spawn(async move { serve(coordinator, envelope).await });
        }
        info!("Coordinator service stopped");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

async fn serve(coordinator: Arc<Coordinator>, envelope: Envelope) {
    match envelope {
        Envelope::Command {
            origin,
            command,
            reply,
        } => {
            let action = command.action();
            let outcome = AssertUnwindSafe(coordinator.handle(origin.as_deref(), command))
                .catch_unwind()
                .await;
            let answer = outcome.unwrap_or_else(|panic| {
                let message = panic_message(&*panic);
                error!("Handler for {} panicked: {}", action, message);
                Reply::error(format!("Internal error: {}", message))
            });
            if reply.send(answer).is_err() {
                debug!("Requester for {} went away before the reply", action);
            }
        }
        Envelope::Menu {
            tab,
            item,
            selection,
        } => {
            let outcome = AssertUnwindSafe(coordinator.on_context_menu(&tab, item, selection))
                .catch_unwind()
                .await;
            if let Err(panic) = outcome {
                error!(
                    "Context menu {} panicked: {}",
                    item.id(),
                    panic_message(&*panic)
                );
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}

/// Sending side of the mailbox. Cheap to clone.
#[derive(Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::Sender<Envelope>,
}

impl CoordinatorHandle {
    /// Send a command and wait for its reply.
    pub async fn request(
        &self,
        origin: Option<SurfaceId>,
        command: Command,
    ) -> Result<Reply, SurfaceError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Envelope::Command {
                origin,
                command,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SurfaceError::CoordinatorUnavailable("mailbox closed".to_string()))?;

        reply_rx
            .await
            .map_err(|_| SurfaceError::CoordinatorUnavailable("reply dropped".to_string()))
    }

    /// Report a context-menu click. Fire and forget.
    pub async fn menu_click(
        &self,
        tab: SurfaceId,
        item: MenuItem,
        selection: Option<String>,
    ) -> Result<(), SurfaceError> {
        self.tx
            .send(Envelope::Menu {
                tab,
                item,
                selection,
            })
            .await
            .map_err(|_| SurfaceError::CoordinatorUnavailable("mailbox closed".to_string()))
    }

    /// A client that sends on behalf of `origin`.
    pub fn client(&self, origin: impl Into<SurfaceId>) -> SurfaceClient {
        SurfaceClient {
            handle: self.clone(),
            origin: origin.into(),
        }
    }
}

/// [`CoordinatorClient`] bound to one surface id.
#[derive(Clone)]
pub struct SurfaceClient {
    handle: CoordinatorHandle,
    origin: SurfaceId,
}

impl SurfaceClient {
    pub fn origin(&self) -> &SurfaceId {
        &self.origin
    }
}

#[async_trait]
impl CoordinatorClient for SurfaceClient {
    async fn request(&self, command: Command) -> Result<Reply, SurfaceError> {
        self.handle.request(Some(self.origin.clone()), command).await
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
