//! Signal handling for graceful shutdown.
//!
//! SIGTERM and SIGINT (Ctrl+C elsewhere) stop the listener; requests
//! already in flight are allowed to finish.

use std::io;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

/// Broadcasts a one-shot shutdown request.
#[derive(Clone)]
pub struct SignalHandler {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalHandler {
    /// Creates a handler that has not been triggered.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx: Arc::new(tx), rx }
    }

    /// Installs the OS signal listeners and spawns the task that waits on them.
    ///
    /// Must be called from within a Tokio runtime.
    #[cfg(unix)]
    pub fn spawn_listener(&self) -> io::Result<()> {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let tx = self.tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                _ = sigint.recv() => info!("Received SIGINT, shutting down"),
            }
            let _ = tx.send(true);
            debug!("Signal listener stopped");
        });
        Ok(())
    }

    /// Installs a Ctrl+C listener.
    #[cfg(not(unix))]
    pub fn spawn_listener(&self) -> io::Result<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C, shutting down");
                let _ = tx.send(true);
            }
        });
        Ok(())
    }

    /// Requests shutdown without an OS signal.
    pub fn trigger_shutdown(&self) {
        let _ = self.tx.send(true);
    }

    /// Resolves once shutdown has been requested.
    ///
    /// Suitable for `axum::serve(..).with_graceful_shutdown(..)`.
    pub async fn wait(self) {
        let mut rx = self.rx;
        // An Err means every sender is gone, so nothing can trigger us anymore.
        let _ = rx.wait_for(|stop| *stop).await;
    }
}
