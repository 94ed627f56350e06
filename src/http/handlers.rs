//! Synthetic workload route handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::http::request::X_REQUEST_ID;
use crate::http::response::AppError;
use crate::http::server::AppState;
use crate::workload::{self, CPU_TASK_ITERATIONS, IO_TASK_DELAY};

/// `GET /`
pub async fn root() -> Json<Value> {
    tracing::info!("Root endpoint called");
    Json(json!({ "Hello": "World" }))
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

/// `GET /items/{item_id}?q=`
pub async fn read_item(
    Path(item_id): Path<String>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Json<ItemResponse> {
    tracing::info!(item_id = %item_id, query = ?query, "Item endpoint called");
    let q = query.get("q").cloned();
    Json(ItemResponse { item_id, q })
}

/// `GET /io_task`: waits without holding the worker.
pub async fn io_task() -> &'static str {
    tokio::time::sleep(IO_TASK_DELAY).await;
    tracing::info!("IO bound task finished");
    "IO bound task finish!"
}

/// `GET /cpu_task`: spins on the request's own task.
///
/// Not offloaded to a blocking pool; occupying the worker is the point.
pub async fn cpu_task() -> &'static str {
    workload::busy_work(CPU_TASK_ITERATIONS);
    tracing::info!("CPU bound task finished");
    "CPU bound task finish!"
}

/// `GET /random_status`
pub async fn random_status(State(state): State<AppState>) -> impl IntoResponse {
    let code = workload::pick_status(state.random.as_ref());
    tracing::warn!(status = code, "Random status endpoint called");
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "path": "/random_status" })))
}

/// `GET /random_sleep`
pub async fn random_sleep(State(state): State<AppState>) -> Json<Value> {
    let delay = workload::pick_sleep(state.random.as_ref());
    tokio::time::sleep(delay).await;
    tracing::info!(sleep_time = delay.as_secs(), "Random sleep endpoint finished");
    Json(json!({ "path": "/random_sleep" }))
}

/// `GET /error_test`: always fails.
pub async fn error_test() -> Result<Json<Value>, AppError> {
    tracing::error!("Error test endpoint encountered an error");
    Err(AppError::Handler("value error".to_string()))
}

/// `GET /chain`: own root, then target one's io task, then target two's cpu task.
pub async fn chain(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    tracing::info!("Chain endpoint started");
    let request_id = headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok());

    let outcomes = state.chain.run(&state.client, request_id).await?;
    for outcome in &outcomes {
        tracing::debug!(
            hop = outcome.hop,
            url = %outcome.url,
            status = outcome.status.as_u16(),
            body_bytes = outcome.body_bytes,
            "Chain hop completed"
        );
    }

    tracing::info!(hops = outcomes.len(), "Chain endpoint finished");
    Ok(Json(json!({ "path": "/chain" })))
}

/// Any other path.
pub async fn not_found(uri: axum::http::Uri) -> impl IntoResponse {
    tracing::debug!(path = %uri.path(), "No route matched");
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("Cannot GET {}", uri.path()) })),
    )
}
