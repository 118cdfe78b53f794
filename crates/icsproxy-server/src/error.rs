//! Proxy error types and their HTTP rendering.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use icsproxy_source::SourceError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Result type for request handling.
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Errors a request can end in.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// No `ics` parameter and no configured fallback.
    #[error("Missing ICS URL (pass ?ics= or configure default_ics_url)")]
    MissingUrl,

    /// The source URL is not https or is too long.
    #[error("Invalid ICS URL")]
    InvalidUrl { reason: String },

    /// Upstream answered with a non-success status.
    #[error("Fetch failed")]
    Upstream { status: u16, body: String },

    /// Anything else: transport failures, unreadable bodies.
    #[error("ICS proxy failure")]
    Internal { detail: String },
}

impl ProxyError {
    /// Creates an invalid URL error.
    pub fn invalid_url(reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            reason: reason.into(),
        }
    }

    /// HTTP status for this error.
    ///
    /// Upstream failures reuse the upstream status verbatim.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingUrl | Self::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `detail` field of the error body, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::MissingUrl | Self::InvalidUrl { .. } => None,
            Self::Upstream { body, .. } => Some(body),
            Self::Internal { detail } => Some(detail),
        }
    }

    fn log(&self) {
        match self {
            Self::MissingUrl => warn!("Request without ICS URL"),
            Self::InvalidUrl { reason } => warn!(reason = %reason, "Rejected ICS URL"),
            Self::Upstream { status, .. } => warn!(status, "Upstream fetch failed"),
            Self::Internal { detail } => error!(detail = %detail, "Proxy failure"),
        }
    }
}

impl From<SourceError> for ProxyError {
    fn from(err: SourceError) -> Self {
        match err.upstream_status() {
            Some(status) => Self::Upstream {
                status,
                body: err.upstream_body().unwrap_or_default().to_string(),
            },
            None => Self::Internal {
                detail: err.to_string(),
            },
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&ProxyError> for ErrorResponse {
    fn from(err: &ProxyError) -> Self {
        Self {
            error: err.to_string(),
            detail: err.detail().map(str::to_string),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        self.log();
        (self.status(), Json(ErrorResponse::from(&self))).into_response()
    }
}
