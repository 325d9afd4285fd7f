use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::info;
use tracing_subscriber::prelude::*;
use uuid::Uuid;

use pane_cast::config::{self, AppConfig, FileConfig};
use pane_cast::{AppState, create_router, monitor, sampler};

/// Custom span maker that adds a unique request ID to each incoming request
#[derive(Clone)]
struct RequestIdMakeSpan;

impl<B> MakeSpan<B> for RequestIdMakeSpan {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> tracing::Span {
        let request_id = Uuid::new_v4().to_string();
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

#[derive(Parser)]
#[command(name = "panecast")]
#[command(about = "Broadcast a tmux pane to browsers as cell-grid deltas over SSE")]
struct Args {
    /// Path to the config file (default: ./panecast.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides config)
    #[arg(short = 'b', long)]
    host: Option<String>,

    /// tmux session to capture (overrides config)
    #[arg(short, long)]
    session: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_directive = if args.debug {
        "panecast=debug,pane_cast=debug,tower_http=debug,info"
    } else {
        "panecast=info,pane_cast=info,tower_http=info,warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();

    let mut file_config: FileConfig = config::load_config(args.config.as_deref())
        .extract()
        .context("Failed to load configuration")?;
    if let Some(port) = args.port {
        file_config.server.port = port;
    }
    if let Some(host) = args.host {
        file_config.server.host = host;
    }
    if let Some(session) = args.session {
        file_config.capture.session = session;
    }

    let state = AppState::new(AppConfig::from_file(&file_config));
    let config = state.config.clone();

    info!(
        "Starting pane broadcast for tmux session '{}'",
        config.capture.session
    );

    tokio::spawn(sampler::run_sampler(
        config.capture.clone(),
        state.store.clone(),
        state.metrics.clone(),
        state.shutdown.clone(),
    ));

    if config.monitor.enabled {
        tokio::spawn(monitor::run_monitor(
            config.capture.session.clone(),
            config.capture.cols,
            config.capture.rows,
            config.monitor.interval,
            state.metrics.clone(),
            state.shutdown.clone(),
        ));
    } else {
        info!("Geometry monitor disabled");
    }

    let shutdown = state.shutdown.clone();
    let app = create_router(state)
        .layer(TraceLayer::new_for_http().make_span_with(RequestIdMakeSpan))
        .layer(CorsLayer::permissive());

    // Failing to bind is the one fatal error
    let addr = format!("{}:{}", config.host, config.port)
        .parse::<SocketAddr>()
        .with_context(|| format!("Invalid bind address {}:{}", config.host, config.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let actual_addr = listener.local_addr()?;

    info!("Pane broadcast listening on http://{}", actual_addr);
    info!("");
    info!("Endpoints:");
    info!("  GET /        - Viewer page");
    info!("  GET /stream  - SSE updates (full frames + deltas)");
    info!("  GET /frame   - Current frame snapshot");
    info!("  GET /health  - Liveness and counters");
    info!("");

    let shutdown_signal = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received shutdown signal, stopping tasks...");
        shutdown.cancel();
    };

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await
    .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}
