//! Synthetic workload service library.
//!
//! A small HTTP service whose routes each produce one recognizable
//! latency, CPU or error pattern, for exercising tracing and log pipelines.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;
pub mod workload;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::Telemetry;
