use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use super::MonitorError;
use crate::modules::local_target::local_target_routes;

/// Serve the always-healthy local test target until `shutdown` resolves
pub async fn serve_local_target<F>(port: u16, shutdown: F) -> Result<(), MonitorError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| MonitorError::Bind { addr, source })?;

    tracing::info!("Starting local test server on {}", addr);

    axum::serve(listener, local_target_routes())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(MonitorError::Serve)?;

    tracing::info!("Local test server stopped");
    Ok(())
}
