//! Listener and shutdown plumbing shared by the HTTP binaries.

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

/// Resolves when the process receives Ctrl-C.
///
/// If the signal handler cannot be installed the future never resolves, so
/// the server keeps running rather than shutting down immediately.
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Binds `addr` and serves `app` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an I/O error if the listener cannot be bound or the server
/// fails while running.
pub async fn serve(
    name: &'static str,
    addr: SocketAddr,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    tracing::info!(server = name, addr = %local, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!(server = name, "server stopped");
    Ok(())
}
