//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign or keep x-request-id)
//!     → observability span (service name, request id)
//!     → handlers.rs (one synthetic workload per route)
//!     → response.rs (AppError → 500/502 JSON)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id_layers, MakeRequestUuidV4, X_REQUEST_ID};
pub use response::AppError;
pub use server::{AppState, HttpServer};
