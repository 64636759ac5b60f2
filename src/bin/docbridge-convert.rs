//! docbridge conversion server entry point.

use std::sync::Arc;

use docbridge::api;
use docbridge::app_state::ConvertState;
use docbridge::config::ConvertConfig;
use docbridge::convert::DocxConverter;
use docbridge::server::{serve, shutdown_signal};
use docbridge::service::ConversionService;
use docbridge::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ConvertConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        max_upload_bytes = config.max_upload_bytes,
        "starting docbridge conversion server"
    );

    let conversion_service = ConversionService::new(Arc::new(DocxConverter::new()))?;
    let state = ConvertState {
        conversion_service: Arc::new(conversion_service),
        max_upload_bytes: config.max_upload_bytes,
    };
    let app = api::convert_router(state);

    serve("convert", config.listen_addr, app, shutdown_signal()).await?;
    Ok(())
}
