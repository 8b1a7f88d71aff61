//! Server run loop: bind, serve, stop accepting on shutdown.

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use realix_core::config::AppConfig;
use realix_core::error::AppError;
use realix_realtime::server::RealtimeEngine;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the engine from `config`, binds the configured address, and
/// serves until `shutdown` resolves.
pub async fn run_server<S>(config: AppConfig, shutdown: S) -> Result<(), AppError>
where
    S: Future<Output = ()> + Send + 'static,
{
    let engine = RealtimeEngine::new(&config.allocator, config.realtime.clone())?;

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    info!(addr = %addr, "service started");

    serve(listener, AppState::new(config, engine), shutdown).await?;

    info!("service stopped");
    Ok(())
}

/// Serves `state` on an already bound listener.
///
/// When `shutdown` resolves the listener stops accepting. Upgraded
/// WebSocket sessions are not tracked by the HTTP server and keep running
/// unless the engine is configured to close them.
pub async fn serve<S>(listener: TcpListener, state: AppState, shutdown: S) -> Result<(), AppError>
where
    S: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state.clone());

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown.await;
        info!("Shutdown signal received, no longer accepting connections");
    })
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    state.realtime.shutdown();
    Ok(())
}
