//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → broadcast → HttpServer::run stops accepting → drains in-flight requests
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → wait_for_signal returns → main triggers shutdown
//! ```
//!
//! # Design Decisions
//! - Startup order lives in main: config, telemetry, runtime, listener, serve
//! - Telemetry is flushed after the runtime has stopped
//! - In-flight /chain hops are not cancelled on shutdown; the drain waits for them

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
