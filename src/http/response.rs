//! Error to response mapping.
//!
//! Every handler failure ends here and becomes a well-formed JSON error.
//! Nothing in a handler is allowed to take the process down.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::upstream::ChainError;

/// Request-level failure.
#[derive(Debug, Error)]
pub enum AppError {
    /// The handler signalled failure itself.
    #[error("{0}")]
    Handler(String),

    /// A `/chain` hop failed.
    #[error(transparent)]
    Upstream(#[from] ChainError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Handler(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::Upstream(ref e) = self {
            tracing::error!(hop = e.hop, url = %e.url, error = %e.source, "Chain aborted");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
