//! Kite HTTP server
//!
//! Serves the demo application (greeting, login and registration) plus the
//! static resources under the configured root.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kite_server::app::{self, SessionManager, UserRepository};
use kite_server::config::KiteConfig;
use kite_server::error::{ServerError, ServerResult};
use kite_server::Server;

#[derive(Parser, Debug)]
#[command(name = "Kite")]
#[command(version)]
#[command(about = "Minimal HTTP/1.1 server with controller dispatch", long_about = None)]
struct Args {
    /// Path to JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override HTTP server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override HTTP server hostname
    #[arg(long)]
    hostname: Option<String>,

    /// Override the static resource directory
    #[arg(long)]
    static_root: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ServerResult<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level)?;

    info!("Starting Kite HTTP server v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => {
            let config = KiteConfig::from_file(path)?;
            info!("Configuration loaded from {}", path.display());
            config
        }
        None => KiteConfig::default(),
    };

    // Apply CLI argument overrides
    if let Some(port) = args.port {
        info!("Overriding port: {}", port);
        config.port = port;
    }
    if let Some(hostname) = args.hostname {
        info!("Overriding hostname: {}", hostname);
        config.hostname = hostname;
    }
    if let Some(static_root) = args.static_root {
        info!("Overriding static root: {}", static_root.display());
        config.static_root = static_root;
    }

    let store = Arc::new(config.static_store());
    let mapping = app::routes(
        store,
        Arc::new(UserRepository::seeded()),
        Arc::new(SessionManager::new()),
    );
    let server = Server::new(config, mapping)?;

    tokio::select! {
        result = server.listen() => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                return Err(e);
            }
        }
        _ = shutdown_signal() => {
            info!("Received shutdown signal");
        }
    }

    info!("Kite server shut down");
    Ok(())
}

/// Initialize structured logging with configurable level
fn init_logging(level: &str) -> ServerResult<()> {
    let env_filter = level
        .parse::<EnvFilter>()
        .map_err(|e| ServerError::Config(format!("Invalid log level '{}': {}", level, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true)
        .init();

    Ok(())
}

/// Resolve on SIGTERM, SIGINT or Ctrl+C
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to setup SIGTERM handler");
        let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
            .expect("Failed to setup SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM signal");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT signal");
            }
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
        info!("Received Ctrl+C");
    }
}
