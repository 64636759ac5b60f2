//! Relay service: pushes commands to the active client and routes what it
//! sends back.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{ClientSlot, ConnectionId, PendingReplies};
use crate::error::RelayError;
use crate::protocol::{ClientMessage, Command, CommandReply, ReplyStatus};

/// Orchestration layer between the REST handlers and the WebSocket client.
///
/// Dispatch is fire-and-forget: [`RelayService::dispatch`] returns once the
/// frame is queued for the socket. [`RelayService::dispatch_and_wait`]
/// additionally blocks on the correlated response envelope.
#[derive(Debug)]
pub struct RelayService {
    slot: Arc<ClientSlot>,
    pending: PendingReplies,
    reply_timeout: Duration,
}

impl RelayService {
    /// Creates a service with an empty client slot.
    #[must_use]
    pub fn new(reply_timeout: Duration) -> Self {
        Self {
            slot: Arc::new(ClientSlot::new()),
            pending: PendingReplies::new(),
            reply_timeout,
        }
    }

    /// Returns a reference to the inner [`ClientSlot`].
    #[must_use]
    pub fn slot(&self) -> &Arc<ClientSlot> {
        &self.slot
    }

    /// Returns `true` if a live client is connected.
    pub async fn is_connected(&self) -> bool {
        self.slot.is_connected().await
    }

    /// Sends `command` to the active client without waiting for a reply.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::NotConnected`] if no live client is tracked.
    /// Nothing is queued in that case.
    pub async fn dispatch(&self, command: &Command) -> Result<(), RelayError> {
        let client = self.slot.current().await.ok_or(RelayError::NotConnected)?;
        let frame = serde_json::to_string(command)
            .map_err(|e| RelayError::Internal(format!("command encoding failed: {e}")))?;
        client.send(frame)?;

        tracing::info!(
            connection = %client.id(),
            action = ?command.action,
            id = command.id.as_deref().unwrap_or_default(),
            "command sent"
        );
        Ok(())
    }

    /// Sends `command` and waits for the client's correlated response.
    ///
    /// # Errors
    ///
    /// - [`RelayError::InvalidRequest`] if the command has no id.
    /// - [`RelayError::NotConnected`] if no live client is tracked.
    /// - [`RelayError::ClientRejected`] if the client answers `error`.
    /// - [`RelayError::ReplyTimeout`] if no answer arrives in time.
    pub async fn dispatch_and_wait(&self, command: &Command) -> Result<CommandReply, RelayError> {
        let id = command
            .id
            .clone()
            .ok_or_else(|| RelayError::InvalidRequest("command id is required".to_string()))?;

        let mut waiter = self.pending.register(&id);
        self.dispatch(command).await?;

        match tokio::time::timeout(self.reply_timeout, waiter.recv()).await {
            Ok(Ok(reply)) => match reply.status {
                ReplyStatus::Success => Ok(reply),
                ReplyStatus::Error => Err(RelayError::ClientRejected {
                    id,
                    message: reply
                        .message
                        .unwrap_or_else(|| "command failed".to_string()),
                }),
            },
            Ok(Err(_)) => Err(RelayError::Internal(format!(
                "reply waiter for {id} was superseded"
            ))),
            Err(_) => Err(RelayError::ReplyTimeout {
                id,
                timeout_secs: self.reply_timeout.as_secs(),
            }),
        }
    }

    /// Handles one text frame received from a client connection.
    ///
    /// Responses resolve any waiting request; events are logged; anything
    /// unparseable is logged and dropped.
    pub async fn handle_client_frame(&self, connection: ConnectionId, text: &str) {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(ClientMessage::Response(reply)) => {
                tracing::info!(
                    %connection,
                    id = %reply.id,
                    status = ?reply.status,
                    message = reply.message.as_deref().unwrap_or_default(),
                    "command response received"
                );
                if !self.pending.resolve(reply) {
                    tracing::debug!(%connection, "no request waiting for this response");
                }
            }
            Ok(ClientMessage::Event { event, path }) => {
                tracing::info!(%connection, ?event, %path, "client event received");
            }
            Err(err) => {
                tracing::warn!(%connection, error = %err, "unrecognised client frame");
            }
        }
    }
}
