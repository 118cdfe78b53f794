//! Error types for fetching calendar documents.
//!
//! Parsing never fails, so every error here comes from getting the document:
//! the upstream answered with a non-success status, the transport failed, or
//! the body could not be read as text.

use std::fmt;
use thiserror::Error;

/// The category of a source error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorCode {
    /// The upstream server answered with a non-success HTTP status.
    UpstreamStatus,
    /// Network error - connection failed, DNS resolution, TLS, etc.
    NetworkError,
    /// The response body could not be read as text.
    InvalidBody,
    /// The source could not be set up (e.g. HTTP client construction).
    ConfigurationError,
}

impl SourceErrorCode {
    /// Returns a machine-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpstreamStatus => "upstream_status",
            Self::NetworkError => "network_error",
            Self::InvalidBody => "invalid_body",
            Self::ConfigurationError => "configuration_error",
        }
    }
}

impl fmt::Display for SourceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while fetching a calendar document.
#[derive(Debug, Error)]
pub struct SourceError {
    code: SourceErrorCode,
    message: String,
    /// Upstream HTTP status, set for [`SourceErrorCode::UpstreamStatus`].
    status: Option<u16>,
    /// Upstream response body, set for [`SourceErrorCode::UpstreamStatus`].
    body: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Creates a new source error with the given code and message.
    pub fn new(code: SourceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            body: None,
            source: None,
        }
    }

    /// Creates an error for a non-success upstream response.
    ///
    /// The body text is kept verbatim so it can be relayed to the caller.
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body: Some(body.into()),
            ..Self::new(
                SourceErrorCode::UpstreamStatus,
                format!("upstream returned HTTP {}", status),
            )
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::NetworkError, message)
    }

    /// Creates an unreadable-body error.
    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::InvalidBody, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::ConfigurationError, message)
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> SourceErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the upstream HTTP status, if the upstream answered.
    pub fn upstream_status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the upstream body text, if the upstream answered.
    pub fn upstream_body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;
