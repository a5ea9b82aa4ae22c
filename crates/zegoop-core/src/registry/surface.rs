//! Registry of live surfaces.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use zegoop_protocols::{ExtensionError, Notification, Surface, SurfaceError, SurfaceKind};

use super::base::{BaseRegistry, Registerable};

/// Longest a single surface may hold up a broadcast.
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(2);

struct SurfaceWrapper(Arc<dyn Surface>);

impl Registerable for SurfaceWrapper {
    fn registry_id(&self) -> &str {
        self.0.id()
    }
}

/// Live surfaces keyed by surface id.
///
/// Surfaces come and go as tabs and pages open and close, so delivery to a
/// registered surface can still fail.
pub struct SurfaceRegistry {
    inner: BaseRegistry<SurfaceWrapper>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self {
            inner: BaseRegistry::new(),
        }
    }

    pub fn register(&self, surface: Arc<dyn Surface>) -> Result<(), ExtensionError> {
        debug!("Surface registered: {} ({})", surface.id(), surface.kind());
        self.inner.register(Arc::new(SurfaceWrapper(surface)))
    }

    pub fn unregister(&self, id: &str) -> Result<(), ExtensionError> {
        debug!("Surface unregistered: {}", id);
        self.inner.unregister(id)
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Surface>> {
        self.inner.get(id).map(|wrapper| wrapper.0.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.contains(id)
    }

    pub fn list_ids(&self) -> Vec<String> {
        self.inner.list_ids()
    }

    /// Ids of the live surfaces of one kind.
    pub fn list_kind(&self, kind: SurfaceKind) -> Vec<String> {
        self.inner
            .snapshot()
            .into_iter()
            .filter(|wrapper| wrapper.0.kind() == kind)
            .map(|wrapper| wrapper.0.id().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Push a notification to one surface.
    pub async fn send_to(
        &self,
        id: &str,
        notification: Notification,
    ) -> Result<(), SurfaceError> {
        let surface = self
            .get(id)
            .ok_or_else(|| SurfaceError::NotFound(id.to_string()))?;
        surface.deliver(notification).await
    }

    /// Push a notification to every live surface except `except`.
    ///
    /// Deliveries run concurrently, each bounded by `DELIVERY_TIMEOUT`.
    /// Failures are logged and dropped. Returns the number of surfaces that
    /// accepted the push.
    pub async fn broadcast(&self, notification: &Notification, except: Option<&str>) -> usize {
        let targets: Vec<_> = self
            .inner
            .snapshot()
            .into_iter()
            .filter(|wrapper| Some(wrapper.0.id().as_str()) != except)
            .collect();

        let deliveries = targets.iter().map(|wrapper| {
            let notification = notification.clone();
            async move {
                let surface = &wrapper.0;
                match tokio::time::timeout(DELIVERY_TIMEOUT, surface.deliver(notification)).await {
                    Ok(Ok(())) => true,
                    Ok(Err(e)) => {
                        warn!("Dropped push to surface {}: {}", surface.id(), e);
                        false
                    }
                    Err(_) => {
                        warn!("Dropped push to surface {}: delivery timed out", surface.id());
                        false
                    }
                }
            }
        });

        join_all(deliveries)
            .await
            .into_iter()
            .filter(|delivered| *delivered)
            .count()
    }
}

impl Default for SurfaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "surface_tests.rs"]
mod tests;
