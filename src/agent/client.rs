//! WebSocket client loop of the bridge agent.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;

use super::executor::CommandExecutor;
use super::host::DocumentHost;
use super::retry::RetryPolicy;
use super::save_monitor::SaveMonitor;
use crate::config::AgentConfig;
use crate::protocol::{ClientMessage, Command};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// Saved events waiting for a connection.
const EVENT_QUEUE_CAPACITY: usize = 16;

/// Floor for the saved-state poll interval.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Errors that end [`BridgeAgent::run`].
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The retry policy ran out of attempts.
    #[error("gave up connecting to {url} after {attempts} failed attempts")]
    RetriesExhausted {
        /// Relay URL.
        url: String,
        /// Consecutive failed connects, the first one included.
        attempts: u32,
    },
}

enum SessionEnd {
    Closed,
    Shutdown,
}

/// Connects to the relay, executes its commands against a
/// [`DocumentHost`], and reports `saved` transitions.
///
/// The agent reconnects whenever the socket closes or a connect fails,
/// pacing attempts with its [`RetryPolicy`]. Cancelling the token passed to
/// [`BridgeAgent::run`] stops the connection, the poller and any pending
/// delay.
#[derive(Debug)]
pub struct BridgeAgent<H> {
    server_url: String,
    host: Arc<H>,
    poll_interval: Duration,
    retry: RetryPolicy,
}

impl<H: DocumentHost> BridgeAgent<H> {
    /// Creates an agent for `server_url`.
    #[must_use]
    pub fn new(
        server_url: impl Into<String>,
        host: Arc<H>,
        poll_interval: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            host,
            poll_interval,
            retry,
        }
    }

    /// Creates an agent from loaded configuration.
    #[must_use]
    pub fn from_config(config: &AgentConfig, host: Arc<H>) -> Self {
        Self::new(
            config.server_url.clone(),
            host,
            config.poll_interval,
            config.retry.clone(),
        )
    }

    /// Runs until `shutdown` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::RetriesExhausted`] when the retry policy
    /// allows no further attempt.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), AgentError> {
        let (event_tx, mut event_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        let poll_token = shutdown.child_token();
        let poller = tokio::spawn(poll_saved(
            Arc::clone(&self.host),
            self.poll_interval,
            event_tx,
            poll_token.clone(),
        ));
        let executor = CommandExecutor::new(Arc::clone(&self.host));

        let mut failures: u32 = 0;
        let result = loop {
            tracing::info!(url = %self.server_url, "connecting to relay");
            let connected = tokio::select! {
                () = shutdown.cancelled() => break Ok(()),
                res = connect_async(self.server_url.as_str()) => res,
            };

            match connected {
                Ok((stream, _)) => {
                    failures = 0;
                    tracing::info!(url = %self.server_url, "connected to relay");
                    // Events raised while offline are stale.
                    while event_rx.try_recv().is_ok() {}

                    match session(stream, &executor, &mut event_rx, &shutdown).await {
                        SessionEnd::Shutdown => break Ok(()),
                        SessionEnd::Closed => tracing::info!("connection to relay closed"),
                    }
                }
                Err(err) => {
                    tracing::warn!(url = %self.server_url, error = %err, "connect failed");
                }
            }

            failures = failures.saturating_add(1);
            let Some(delay) = self.retry.delay_for(failures) else {
                break Err(AgentError::RetriesExhausted {
                    url: self.server_url.clone(),
                    attempts: failures,
                });
            };
            tracing::info!(
                attempt = failures,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "reconnecting"
            );
            tokio::select! {
                () = shutdown.cancelled() => break Ok(()),
                () = tokio::time::sleep(delay) => {}
            }
        };

        poll_token.cancel();
        if let Err(err) = poller.await {
            tracing::warn!(error = %err, "saved-state poller failed");
        }
        tracing::info!("bridge agent stopped");
        result
    }
}

async fn session<H: DocumentHost>(
    stream: WsStream,
    executor: &CommandExecutor<H>,
    events: &mut mpsc::Receiver<ClientMessage>,
    shutdown: &CancellationToken,
) -> SessionEnd {
    let (mut ws_tx, mut ws_rx) = stream.split();
    let mut events_open = true;

    loop {
        tokio::select! {
            () = shutdown.cancelled() => {
                let _ = ws_tx.send(Message::Close(None)).await;
                return SessionEnd::Shutdown;
            }
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = handle_command(executor, text.as_str()).await
                            && !send_envelope(&mut ws_tx, &reply).await
                        {
                            return SessionEnd::Closed;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => return SessionEnd::Closed,
                    Some(Err(err)) => {
                        tracing::warn!(error = %err, "relay socket error");
                        return SessionEnd::Closed;
                    }
                    Some(Ok(_)) => {}
                }
            }
            event = events.recv(), if events_open => {
                match event {
                    Some(event) => {
                        if !send_envelope(&mut ws_tx, &event).await {
                            return SessionEnd::Closed;
                        }
                    }
                    None => events_open = false,
                }
            }
        }
    }
}

async fn handle_command<H: DocumentHost>(
    executor: &CommandExecutor<H>,
    text: &str,
) -> Option<ClientMessage> {
    match serde_json::from_str::<Command>(text) {
        Ok(command) => executor.execute(command).await,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unrecognised command");
            None
        }
    }
}

/// Returns `false` once the socket can no longer be written.
async fn send_envelope(ws_tx: &mut WsSink, message: &ClientMessage) -> bool {
    let frame = match serde_json::to_string(message) {
        Ok(frame) => frame,
        Err(err) => {
            tracing::error!(error = %err, "envelope encoding failed");
            return true;
        }
    };
    match ws_tx.send(Message::text(frame)).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "failed to send to relay");
            false
        }
    }
}

async fn poll_saved<H: DocumentHost>(
    host: Arc<H>,
    every: Duration,
    events: mpsc::Sender<ClientMessage>,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(every.max(MIN_POLL_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut monitor = SaveMonitor::new();

    loop {
        tokio::select! {
            () = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let saved = match host.is_saved().await {
            Ok(saved) => saved,
            Err(err) => {
                tracing::debug!(error = %err, "saved state unavailable");
                monitor.reset();
                continue;
            }
        };
        if !monitor.observe(saved) {
            continue;
        }

        let path = match host.document_path().await {
            Ok(path) => path.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = %err, "document path unavailable");
                continue;
            }
        };
        tracing::info!(%path, "document saved");
        match events.try_send(ClientMessage::saved(path)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => tracing::debug!("event queue full, dropping saved event"),
            Err(TrySendError::Closed(_)) => break,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::agent::MemoryHost;

    #[tokio::test(start_paused = true)]
    async fn poller_emits_one_event_per_save() {
        let host = Arc::new(MemoryHost::new("C:\\docs\\a.docx"));
        let (tx, mut rx) = mpsc::channel(4);
        let token = CancellationToken::new();
        let poller = tokio::spawn(poll_saved(
            Arc::clone(&host),
            Duration::from_millis(100),
            tx,
            token.clone(),
        ));

        // Initial observation (saved) is silent.
        tokio::time::sleep(Duration::from_millis(150)).await;
        host.set_saved(false).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        host.set_saved(true).await;
        tokio::time::sleep(Duration::from_millis(300)).await;

        let Some(event) = rx.recv().await else {
            panic!("saved event expected");
        };
        assert_eq!(event, ClientMessage::saved("C:\\docs\\a.docx"));
        assert!(rx.try_recv().is_err());

        token.cancel();
        assert!(poller.await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_when_attempts_are_spent() {
        let host = Arc::new(MemoryHost::new("a.docx"));
        let agent = BridgeAgent::new(
            "ws://127.0.0.1:9/ws",
            host,
            Duration::from_secs(1),
            RetryPolicy::fixed(Duration::from_millis(10)).with_max_attempts(2),
        );

        let result = agent.run(CancellationToken::new()).await;
        assert!(matches!(
            result,
            Err(AgentError::RetriesExhausted { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn cancellation_stops_the_reconnect_loop() {
        let host = Arc::new(MemoryHost::new("a.docx"));
        let agent = BridgeAgent::new(
            "ws://127.0.0.1:9/ws",
            host,
            Duration::from_secs(1),
            RetryPolicy::fixed(Duration::from_secs(3600)),
        );
        let token = CancellationToken::new();
        let run = tokio::spawn(agent.run(token.clone()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
        let Ok(result) = run.await else {
            panic!("agent task panicked");
        };
        assert!(result.is_ok());
    }
}
