//! Serve command: runs the HTTP proxy in the foreground.
//!
//! Blocks until SIGTERM/SIGINT, then stops accepting connections and lets
//! in-flight requests finish.

use std::io;
use std::sync::Arc;

use anyhow::Context;
use icsproxy_source::{HttpSource, HttpSourceConfig};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::handler::{AppState, router};
use crate::signals::SignalHandler;

/// Starts the proxy with an HTTP source built from `config`.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let source = HttpSource::new(HttpSourceConfig::default().with_user_agent(&config.user_agent))
        .context("failed to create HTTP source")?;

    match config.default_ics_url.as_deref() {
        Some(url) => info!(default_ics_url = %url, "Using configured fallback calendar"),
        None => info!("No default_ics_url configured, requests must pass ?ics="),
    }

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;

    let signals = SignalHandler::new();
    signals
        .spawn_listener()
        .context("failed to install signal handlers")?;

    let state = AppState::new(config, Arc::new(source));
    serve_until(listener, state, signals)
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

/// Serves `state` on `listener` until `shutdown` is triggered.
pub async fn serve_until(
    listener: TcpListener,
    state: AppState,
    shutdown: SignalHandler,
) -> io::Result<()> {
    info!(address = %listener.local_addr()?, "icsproxy listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown.wait())
        .await
}
