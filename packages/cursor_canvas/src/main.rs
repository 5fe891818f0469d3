use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::prelude::*;

use cursor_canvas::config::ServerConfig;
use cursor_canvas::{AppState, build_router};

#[derive(Parser)]
#[command(name = "cursors")]
#[command(about = "Real-time shared-cursor relay server")]
struct Args {
    /// Port for the web server (0 = auto-select)
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Host to bind to
    #[arg(short = 'b', long, default_value = "127.0.0.1")]
    host: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let default_directive = if args.debug {
        "cursor_canvas=debug,tower_http=debug,info"
    } else {
        "cursor_canvas=info,tower_http=info,warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();

    let config = ServerConfig::from_env();
    let state = AppState::new(config);
    let app = build_router(state);

    let addr = format!("{}:{}", args.host, args.port)
        .parse::<SocketAddr>()
        .context("invalid bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    let actual_addr = listener.local_addr()?;

    info!("Cursor canvas listening on http://{}", actual_addr);
    info!("Endpoints:");
    info!("  GET  /        - Shared canvas page");
    info!("  GET  /ws      - WebSocket cursor channel");
    info!("  GET  /health  - Server health");
    info!("  GET  /metrics - Server metrics");

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received shutdown signal, shutting down");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("Server error")
}
