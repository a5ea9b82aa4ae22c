//! Surface registration for in-process controllers.

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};

use zegoop_protocols::{Notification, Surface, SurfaceError, SurfaceId, SurfaceKind};

/// Delivers pushes into a controller's event mailbox.
///
/// Register it with the coordinator's surface registry; once the mailbox
/// receiver is dropped every delivery fails with `NoListener`. Delivery never
/// waits: a full mailbox fails with `SendFailed`.
pub struct ChannelSurface<E> {
    id: SurfaceId,
    kind: SurfaceKind,
    tx: mpsc::Sender<E>,
}

impl<E> ChannelSurface<E>
where
    E: From<Notification> + Send + 'static,
{
    pub fn new(id: impl Into<SurfaceId>, kind: SurfaceKind, tx: mpsc::Sender<E>) -> Self {
        Self {
            id: id.into(),
            kind,
            tx,
        }
    }
}

#[async_trait]
impl<E> Surface for ChannelSurface<E>
where
    E: From<Notification> + Send + 'static,
{
    fn id(&self) -> &SurfaceId {
        &self.id
    }

    fn kind(&self) -> SurfaceKind {
        self.kind
    }

    async fn deliver(&self, notification: Notification) -> Result<(), SurfaceError> {
        self.tx
            .try_send(E::from(notification))
            .map_err(|e| match e {
                TrySendError::Full(_) => {
                    SurfaceError::SendFailed(format!("mailbox of {} is full", self.id))
                }
                TrySendError::Closed(_) => SurfaceError::NoListener(self.id.clone()),
            })
    }
}
