//! docbridge relay server entry point.
//!
//! Serves the REST endpoints and the WebSocket the bridge client connects
//! to, until Ctrl-C.

use std::sync::Arc;

use docbridge::api;
use docbridge::app_state::RelayState;
use docbridge::config::RelayConfig;
use docbridge::server::{serve, shutdown_signal};
use docbridge::service::RelayService;
use docbridge::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = RelayConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        max_body_bytes = config.max_body_bytes,
        reply_timeout_secs = config.reply_timeout.as_secs(),
        "starting docbridge relay"
    );

    let state = RelayState {
        relay_service: Arc::new(RelayService::new(config.reply_timeout)),
    };
    let app = api::relay_router(state, config.max_body_bytes);

    serve("relay", config.listen_addr, app, shutdown_signal()).await?;
    Ok(())
}
