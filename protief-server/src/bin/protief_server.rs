//! ProTief content server entry point.
//!
//! Serves the content document, image uploads and the uploaded files.

use anyhow::{Context, Result};
use clap::Parser;
use protief_server::ServerConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Server CLI arguments. Flags override values from `--config`.
#[derive(Parser, Debug)]
#[command(name = "protief-server")]
#[command(about = "ProTief content and upload API")]
struct Args {
    /// TOML configuration file.
    #[arg(short, long, env = "PROTIEF_SERVER_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP API listen address.
    #[arg(short = 'l', long, env = "PROTIEF_LISTEN")]
    listen: Option<SocketAddr>,

    /// Content document path.
    #[arg(long, env = "PROTIEF_CONTENT_FILE")]
    content_file: Option<PathBuf>,

    /// Uploads directory.
    #[arg(long, env = "PROTIEF_UPLOADS_DIR")]
    uploads_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ServerConfig::default(),
        };
        if let Some(listen) = self.listen {
            config.listen = listen;
        }
        if let Some(content_file) = self.content_file {
            config.content_file = content_file;
        }
        if let Some(uploads_dir) = self.uploads_dir {
            config.uploads_dir = uploads_dir;
        }
        Ok(config)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let config = args.into_config()?;
    tracing::info!("Starting ProTief content server");

    protief_server::serve(config, shutdown_signal()).await
}
