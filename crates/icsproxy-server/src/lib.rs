//! HTTP front end of the calendar proxy.
//!
//! This crate provides the `icsproxy` binary and the pieces it is built from:
//! - [`router`] - the axum routes (`/`, `/api/events`, `/healthz`)
//! - [`ServerConfig`] - listen address, fallback URL and response limits
//! - [`ProxyError`] - request failures and their JSON rendering
//! - [`SignalHandler`] - graceful shutdown on SIGTERM/SIGINT
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use icsproxy_server::{AppState, ServerConfig, router};
//! use icsproxy_source::{HttpSource, HttpSourceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let source = HttpSource::new(HttpSourceConfig::default())?;
//!     let listener = tokio::net::TcpListener::bind(config.listen).await?;
//!
//!     axum::serve(listener, router(AppState::new(config, Arc::new(source)))).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod handler;
pub mod query;
pub mod signals;

pub use config::{ConfigError, ConfigResult, ServerConfig};
pub use error::{ErrorResponse, ProxyError, ProxyResult};
pub use handler::{
    AppState, EventsResponse, HealthResponse, resolve_url, router, validate_url,
};
pub use query::{EventsQuery, parse_max_results};
pub use signals::SignalHandler;
