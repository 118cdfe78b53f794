//! HTTP source for remote calendar documents.
//!
//! One GET per fetch, no request timeout and no retries: a slow upstream
//! holds only the request that is waiting on it.

use reqwest::{Client, Response, header};
use tracing::{debug, trace, warn};

use crate::error::{SourceError, SourceResult};
use crate::source::{BoxFuture, IcsSource};

/// `Accept` header sent with every fetch.
const ACCEPT_CALENDAR: &str = "text/calendar, text/plain;q=0.9, */*;q=0.8";

/// Configuration for [`HttpSource`].
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// User agent string.
    pub user_agent: String,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("icsproxy/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpSourceConfig {
    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Fetches calendar documents over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Creates a new source with the given configuration.
    pub fn new(config: HttpSourceConfig) -> SourceResult<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                SourceError::configuration(format!("Failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self { client })
    }

    /// Performs the GET and returns the body text.
    pub async fn get(&self, url: &str) -> SourceResult<String> {
        trace!(url = %url, "Sending request");

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, ACCEPT_CALENDAR)
            .send()
            .await
            .map_err(|e| SourceError::network(format!("Request failed: {}", e)).with_source(e))?;

        self.handle_response(response).await
    }

    /// Handles the HTTP response and extracts the body.
    async fn handle_response(&self, response: Response) -> SourceResult<String> {
        let status = response.status();
        trace!(status = %status, "Received response");

        if status.is_success() {
            let body = response.text().await.map_err(|e| {
                SourceError::invalid_body(format!("Failed to read response: {}", e)).with_source(e)
            })?;
            debug!(bytes = body.len(), "Fetched calendar document");
            return Ok(body);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(error = %e, "Failed to read upstream error body");
                String::new()
            }
        };
        warn!(status = %status, "Upstream returned non-success status");
        Err(SourceError::upstream(status.as_u16(), body))
    }
}

impl IcsSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, SourceResult<String>> {
        Box::pin(self.get(url))
    }
}
