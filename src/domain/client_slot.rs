//! Swappable handle to the single active bridge client.
//!
//! [`ClientSlot`] stores at most one [`ClientHandle`] behind a
//! [`tokio::sync::RwLock`]. Accepting a connection calls
//! [`ClientSlot::replace`]; the superseded connection is handed back to the
//! caller and otherwise left alone. Closing a connection calls
//! [`ClientSlot::release`], which is a no-op unless that connection is the
//! one currently tracked.

use tokio::sync::{RwLock, mpsc};

use super::ConnectionId;
use crate::error::RelayError;

/// Outbound side of one WebSocket connection.
///
/// Frames pushed through the handle are written to the socket by the
/// connection's own task.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    id: ConnectionId,
    outbound: mpsc::UnboundedSender<String>,
}

impl ClientHandle {
    /// Wraps the sender feeding a connection's write loop.
    #[must_use]
    pub fn new(outbound: mpsc::UnboundedSender<String>) -> Self {
        Self {
            id: ConnectionId::new(),
            outbound,
        }
    }

    /// Identity of the underlying connection.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns `true` while the connection's write loop is still running.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.outbound.is_closed()
    }

    /// Queues a text frame for the socket.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::NotConnected`] if the write loop has exited.
    pub fn send(&self, frame: String) -> Result<(), RelayError> {
        self.outbound
            .send(frame)
            .map_err(|_| RelayError::NotConnected)
    }
}

/// Holder of the active client. Last connection wins.
#[derive(Debug, Default)]
pub struct ClientSlot {
    active: RwLock<Option<ClientHandle>>,
}

impl ClientSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `handle` the active client, returning the one it superseded.
    pub async fn replace(&self, handle: ClientHandle) -> Option<ClientHandle> {
        self.active.write().await.replace(handle)
    }

    /// Clears the slot if `id` is still the active client.
    ///
    /// Returns `true` if the slot was cleared.
    pub async fn release(&self, id: ConnectionId) -> bool {
        let mut active = self.active.write().await;
        if active.as_ref().is_some_and(|h| h.id() == id) {
            *active = None;
            true
        } else {
            false
        }
    }

    /// Returns the active client if its connection is still open.
    pub async fn current(&self) -> Option<ClientHandle> {
        self.active
            .read()
            .await
            .as_ref()
            .filter(|h| h.is_open())
            .cloned()
    }

    /// Returns `true` if a live client is tracked.
    pub async fn is_connected(&self) -> bool {
        self.current().await.is_some()
    }
}
