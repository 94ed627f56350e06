//! Outbound HTTP client.

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::Span;

use crate::config::UpstreamConfig;
use crate::http::X_REQUEST_ID;
use crate::observability::otel;

/// Errors from a single outbound call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Connection, timeout or body read failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The peer answered with a non-success status.
    #[error("request to {url} returned status {status}")]
    Status { url: String, status: StatusCode },
}

/// Status and body of a successful outbound call.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Thin wrapper over a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    inner: reqwest::Client,
}

impl UpstreamClient {
    /// Build a client. Without `timeout_ms` calls wait indefinitely.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        // Peers are addressed directly, never through an environment proxy.
        let mut builder = reqwest::Client::builder().no_proxy();
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let inner = builder.build().map_err(UpstreamError::ClientBuild)?;
        Ok(Self { inner })
    }

    /// Issue a GET and read the whole body.
    ///
    /// `request_id` is forwarded as `x-request-id` when present, and the
    /// current span's trace context as `traceparent`.
    pub async fn get(
        &self,
        url: &str,
        request_id: Option<&str>,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let mut headers = HeaderMap::new();
        if let Some(value) = request_id.and_then(|id| HeaderValue::from_str(id).ok()) {
            headers.insert(X_REQUEST_ID, value);
        }
        otel::inject_context(&Span::current(), &mut headers);

        let request = self.inner.get(url).headers(headers);

        let transport = |source| UpstreamError::Transport {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(transport)?;
        Ok(UpstreamResponse { status, body })
    }
}
