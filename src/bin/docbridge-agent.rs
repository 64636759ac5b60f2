//! docbridge bridge agent entry point.
//!
//! Drives a document file on disk from the relay's commands. Ctrl-C stops
//! the connection loop and the saved-state poller.

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use docbridge::agent::{BridgeAgent, FileHost};
use docbridge::config::AgentConfig;
use docbridge::server::shutdown_signal;
use docbridge::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AgentConfig::from_env()?;
    tracing::info!(
        url = %config.server_url,
        document = %config.document_path.display(),
        poll_interval_ms = u64::try_from(config.poll_interval.as_millis()).unwrap_or(u64::MAX),
        "starting docbridge agent"
    );

    let host = FileHost::open(&config.document_path)
        .await
        .with_context(|| format!("opening {}", config.document_path.display()))?;
    let agent = BridgeAgent::from_config(&config, Arc::new(host));

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.cancel();
    });

    agent.run(shutdown).await?;
    Ok(())
}
