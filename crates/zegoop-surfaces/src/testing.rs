//! Test doubles shared by the controller tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use zegoop_protocols::{Command, CoordinatorClient, Reply, SurfaceError};

use crate::view::View;

type Responder = dyn Fn(&Command) -> Result<Reply, SurfaceError> + Send + Sync;

/// A coordinator stand-in that answers from a closure and records commands.
pub struct ScriptedClient {
    responder: Box<Responder>,
    commands: Mutex<Vec<Command>>,
}

impl ScriptedClient {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&Command) -> Result<Reply, SurfaceError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Answers `getSettings` with `settings`, everything else with an ack.
    pub fn with_settings(settings: Value) -> Self {
        let map = settings.as_object().cloned().unwrap_or_default();
        Self::new(move |command| match command {
            Command::GetSettings => Ok(Reply::Settings(map.clone())),
            _ => Ok(Reply::ack()),
        })
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().clone()
    }

    pub fn count(&self, action: &str) -> usize {
        self.commands
            .lock()
            .iter()
            .filter(|c| c.action() == action)
            .count()
    }
}

#[async_trait]
impl CoordinatorClient for ScriptedClient {
    async fn request(&self, command: Command) -> Result<Reply, SurfaceError> {
        let reply = (self.responder)(&command);
        self.commands.lock().push(command);
        reply
    }
}

/// A view that keeps every update it was asked to draw.
pub struct RecordingView<U> {
    updates: Mutex<Vec<U>>,
}

impl<U: Clone> RecordingView<U> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            updates: Mutex::new(Vec::new()),
        })
    }

    pub fn updates(&self) -> Vec<U> {
        self.updates.lock().clone()
    }

    pub fn last(&self) -> Option<U> {
        self.updates.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.updates.lock().clear();
    }
}

impl<U: Clone + Send> View<U> for RecordingView<U> {
    fn render(&self, update: U) {
        self.updates.lock().push(update);
    }
}
