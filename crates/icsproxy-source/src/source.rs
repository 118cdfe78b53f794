//! IcsSource trait definition.
//!
//! An [`IcsSource`] turns a calendar URL into document text. The HTTP
//! implementation lives in [`crate::http`]; [`StaticSource`] serves canned
//! responses for tests and offline use.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use crate::error::{SourceError, SourceResult};

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe so the server can hold an
/// `Arc<dyn IcsSource>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Fetches calendar documents.
///
/// Implementations must not retry: a failed fetch is reported immediately.
pub trait IcsSource: Send + Sync {
    /// Returns the name of this source (e.g., "http", "static").
    fn name(&self) -> &str;

    /// Fetches the full document body at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::upstream`] for non-success responses, carrying
    /// the upstream status and body, and a network or body error otherwise.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, SourceResult<String>>;
}

/// A canned response served by [`StaticSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticResponse {
    /// A successful response with this body.
    Body(String),
    /// A non-success response.
    Status { status: u16, body: String },
    /// A transport failure with this message.
    NetworkError(String),
}

impl StaticResponse {
    fn to_result(&self) -> SourceResult<String> {
        match self {
            Self::Body(body) => Ok(body.clone()),
            Self::Status { status, body } => Err(SourceError::upstream(*status, body.clone())),
            Self::NetworkError(message) => Err(SourceError::network(message.clone())),
        }
    }
}

/// A source that answers from an in-memory table.
///
/// Unknown URLs answer with a 404. Every requested URL is recorded.
#[derive(Debug, Default)]
pub struct StaticSource {
    responses: HashMap<String, StaticResponse>,
    requests: Mutex<Vec<String>>,
}

impl StaticSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to register a successful body.
    pub fn with_body(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.with_response(url, StaticResponse::Body(body.into()))
    }

    /// Builder method to register any response.
    pub fn with_response(mut self, url: impl Into<String>, response: StaticResponse) -> Self {
        self.responses.insert(url.into(), response);
        self
    }

    /// URLs fetched so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl IcsSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, SourceResult<String>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        let result = match self.responses.get(url) {
            Some(response) => response.to_result(),
            None => Err(SourceError::upstream(404, "Not Found")),
        };
        Box::pin(async move { result })
    }
}
