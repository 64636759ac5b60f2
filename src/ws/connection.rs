//! Read/write loop for one bridge client connection.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::domain::ClientHandle;
use crate::service::RelayService;

/// Runs a client connection until the socket closes.
///
/// - Registers the connection as the active client, superseding any other.
/// - Writes frames queued through its [`ClientHandle`] to the socket.
/// - Hands every text frame from the client to the relay service.
///
/// A superseded connection keeps reading (its responses still correlate)
/// but no longer receives commands.
pub async fn run_connection(socket: WebSocket, service: Arc<RelayService>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();

    let handle = ClientHandle::new(out_tx);
    let connection = handle.id();
    if let Some(previous) = service.slot().replace(handle).await {
        tracing::warn!(%connection, superseded = %previous.id(), "new client superseded the active one");
    }
    tracing::info!(%connection, "client connected");

    let mut outbound_open = true;
    loop {
        tokio::select! {
            // Frame from the client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        service.handle_client_frame(connection, text.as_str()).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::warn!(%connection, error = %err, "client socket error");
                        break;
                    }
                    _ => {}
                }
            }
            // Command queued for the client
            frame = out_rx.recv(), if outbound_open => {
                match frame {
                    Some(frame) => {
                        if ws_tx.send(Message::text(frame)).await.is_err() {
                            break;
                        }
                    }
                    None => outbound_open = false,
                }
            }
        }
    }

    if service.slot().release(connection).await {
        tracing::info!(%connection, "client disconnected");
    } else {
        tracing::info!(%connection, "superseded client disconnected");
    }
}
