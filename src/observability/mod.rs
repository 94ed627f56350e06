//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! main
//!     → logging.rs (Telemetry::init installs the subscriber, returns a handle)
//!     → otel.rs (OTLP span exporter when an endpoint is configured)
//!     → HttpServer::new(config, &telemetry)
//!     → span.rs (one span per request, parented on any inbound traceparent)
//!     → handlers emit info/warn/error events inside that span
//!     → upstream hops inject traceparent for the next instance
//! ```
//!
//! # Design Decisions
//! - Initialization is an explicit call producing a handle, not ambient setup
//! - Initialization failure is non-fatal; the server runs without a subscriber
//! - JSON records by default, one object per line
//! - Spans go to the collector over OTLP/HTTP only when an endpoint is set
//! - W3C trace context is always propagated, so chains stay one trace

pub mod logging;
pub mod otel;
pub mod span;

pub use logging::{StartupError, Telemetry};
pub use span::{trace_layer, RequestSpan};
