#![forbid(unsafe_code)]

//! `capture-relay` — capture-relay coordinator binary.
//!
//! Bootstraps configuration and tracing, starts the liveness monitor and
//! the HTTP/WebSocket server, and shuts everything down gracefully on
//! ctrl-c or SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use capture_relay::config::GlobalConfig;
use capture_relay::relay::liveness::spawn_liveness_monitor;
use capture_relay::relay::AppState;
use capture_relay::{http, AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "capture-relay", about = "Capture-relay coordinator server", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Override the configured HTTP/WebSocket listen port.
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("capture-relay coordinator bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = match args.config {
        Some(path) => GlobalConfig::load_from_path(path)?,
        None => GlobalConfig::default(),
    };
    if let Some(port) = args.port {
        config.http_port = port;
    }
    info!(port = config.http_port, "configuration loaded");

    // ── Build shared application state ──────────────────
    let state = AppState::new(config);

    // ── Start liveness monitor ──────────────────────────
    let ct = CancellationToken::new();
    let liveness_handle = spawn_liveness_monitor(
        Arc::clone(&state.registry),
        state.config.heartbeat_interval(),
        ct.clone(),
    );
    info!("liveness monitor started");

    // ── Serve HTTP + WebSocket ──────────────────────────
    let bind = SocketAddr::from(([0, 0, 0, 0], state.config.http_port));
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|err| AppError::Transport(format!("failed to bind on {bind}: {err}")))?;
    info!(%bind, "coordinator listening");

    let shutdown_ct = ct.clone();
    axum::serve(listener, http::router(state))
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("shutdown signal received");
            shutdown_ct.cancel();
        })
        .await
        .map_err(|err| AppError::Transport(format!("server error: {err}")))?;

    // ── Wait for background tasks ───────────────────────
    let _ = liveness_handle.await;
    info!("capture-relay shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
