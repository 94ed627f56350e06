//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (optional) + process environment
//!     → loader.rs (lookup keys, parse values)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → handed to Telemetry::init and HttpServer::new
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload
//! - Every key is optional and falls back to a default
//! - Loading works over an arbitrary key lookup so tests never touch the real environment

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{
    ListenerConfig, LogFormat, ObservabilityConfig, ServiceConfig, TargetsConfig, UpstreamConfig,
};
