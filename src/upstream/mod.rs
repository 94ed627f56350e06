//! Outbound calls to other service instances.
//!
//! # Data Flow
//! ```text
//! /chain handler
//!     → chain.rs (ordered hop plan, stop at first failure)
//!     → client.rs (GET with request-id propagation)
//!     → peer instance
//! ```
//!
//! # Design Decisions
//! - No retries: the first failing hop aborts the chain
//! - No timeout unless one is configured
//! - Non-2xx responses are failures, same as transport errors

pub mod chain;
pub mod client;

pub use chain::{ChainError, ChainPlan, Hop, HopOutcome};
pub use client::{UpstreamClient, UpstreamError, UpstreamResponse};
