//! Per-request spans.

use axum::http::Request;
use std::sync::Arc;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::http::X_REQUEST_ID;
use crate::observability::{otel, Telemetry};

/// Builds the root span for each inbound request.
#[derive(Debug, Clone)]
pub struct RequestSpan {
    service_name: Arc<str>,
}

impl RequestSpan {
    pub fn new(telemetry: &Telemetry) -> Self {
        Self {
            service_name: Arc::from(telemetry.service_name()),
        }
    }
}

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");

        let span = tracing::info_span!(
            "request",
            service.name = %self.service_name,
            request_id = %request_id,
            method = %request.method(),
            uri = %request.uri(),
        );
        let _ = span.set_parent(otel::extract_context(request.headers()));
        span
    }
}

pub type HttpTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    RequestSpan,
    DefaultOnRequest,
    DefaultOnResponse,
>;

/// HTTP trace layer: request span plus a completion event with status and latency.
pub fn trace_layer(telemetry: &Telemetry) -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan::new(telemetry))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}
