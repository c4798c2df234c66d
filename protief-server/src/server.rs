use crate::config::ServerConfig;
use crate::presentation::{create_router, AppState};
use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Binds the configured address and serves until `shutdown` resolves.
pub async fn serve<F>(config: ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;
    serve_with_listener(listener, config, shutdown).await
}

/// Serves on an already bound listener.
pub async fn serve_with_listener<F>(
    listener: TcpListener,
    config: ServerConfig,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().context("Failed to read local address")?;
    tracing::info!("Content file: {}", config.content_file.display());
    tracing::info!("Uploads directory: {}", config.uploads_dir.display());

    let app = create_router(Arc::new(AppState::from_config(config)));

    tracing::info!("HTTP API listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")
}
