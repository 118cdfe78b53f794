//! HTTP routes.
//!
//! Each request is independent: resolve the calendar URL, fetch it once,
//! parse, select and answer. Nothing is cached in-process; freshness is
//! delegated to downstream caches through `Cache-Control`.

use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::{HeaderValue, Method, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use icsproxy_core::{NormalizedEvent, select_events};
use icsproxy_source::{IcsSource, ics::parse_ics};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{Instrument, debug, info, info_span};

use crate::config::ServerConfig;
use crate::error::{ProxyError, ProxyResult};
use crate::query::EventsQuery;

/// Shared state handed to every request.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    source: Arc<dyn IcsSource>,
}

impl AppState {
    /// Creates the state from a configuration and a document source.
    pub fn new(config: ServerConfig, source: Arc<dyn IcsSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Body of a successful events response.
#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub items: Vec<NormalizedEvent>,
}

/// Body of the health endpoint.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Builds the application router.
///
/// CORS applies to every response, errors included.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(list_events))
        .route("/api/events", get(list_events))
        .route("/healthz", get(health))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// GET /api/events - fetch, filter and return calendar events
///
/// The query string is decoded leniently: repeated keys keep their first
/// value and nothing in it can reject the request before the handler runs.
async fn list_events(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> ProxyResult<Response> {
    let query = EventsQuery::from_query_string(raw_query.as_deref().unwrap_or_default());
    let config = state.config();
    let url = resolve_url(query.ics_url(), config.default_ics_url.as_deref())?;
    validate_url(url, config.max_url_length)?;

    let span = info_span!("list_events", host = %host_of(url), source = state.source.name());
    async {
        let body = state.source.fetch(url).await?;
        let outcome = parse_ics(&body);
        let parsed = outcome.events.len();

        let window = query.window();
        let max_results = query.max_results_or(config.default_max_results);
        let items = select_events(outcome.events, &window, max_results);

        debug!(stats = ?outcome.stats, "Parsed calendar");
        info!(parsed, returned = items.len(), max_results, "Served events");

        Ok::<_, ProxyError>(with_cache_control(
            Json(EventsResponse { items }),
            &config.cache_control,
        ))
    }
    .instrument(span)
    .await
}

/// GET /healthz - liveness check
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Picks the request URL, falling back to the configured default.
pub fn resolve_url<'a>(
    requested: Option<&'a str>,
    fallback: Option<&'a str>,
) -> ProxyResult<&'a str> {
    requested
        .or(fallback.filter(|url| !url.trim().is_empty()))
        .ok_or(ProxyError::MissingUrl)
}

/// Accepts only `https://` URLs of at most `max_length` characters.
///
/// The scheme check ignores ASCII case.
pub fn validate_url(url: &str, max_length: usize) -> ProxyResult<()> {
    let is_https = url
        .get(..HTTPS_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(HTTPS_PREFIX));
    if !is_https {
        return Err(ProxyError::invalid_url("scheme is not https"));
    }

    let length = url.chars().count();
    if length > max_length {
        return Err(ProxyError::invalid_url(format!(
            "{length} characters exceeds the {max_length} limit"
        )));
    }

    Ok(())
}

const HTTPS_PREFIX: &str = "https://";

fn with_cache_control(response: impl IntoResponse, value: &str) -> Response {
    let mut response = response.into_response();
    if let Ok(value) = HeaderValue::from_str(value) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    response
}

fn host_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_default()
}
