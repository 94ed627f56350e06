//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the eight workload routes
//! - Wire up middleware (request id, tracing, panic boundary)
//! - Bind server to listener and stop on the shutdown broadcast

use axum::{
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::request::request_id_layers;
use crate::http::response::AppError;
use crate::observability::{trace_layer, Telemetry};
use crate::upstream::{ChainPlan, UpstreamClient, UpstreamError};
use crate::workload::{RandomSource, ThreadRandom};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<ChainPlan>,
    pub client: UpstreamClient,
    pub random: Arc<dyn RandomSource>,
}

/// HTTP server for the workload service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server drawing randomness from the thread RNG.
    pub fn new(config: ServiceConfig, telemetry: &Telemetry) -> Result<Self, UpstreamError> {
        Self::with_random(config, telemetry, Arc::new(ThreadRandom))
    }

    /// Create a server with an explicit random source.
    pub fn with_random(
        config: ServiceConfig,
        telemetry: &Telemetry,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self, UpstreamError> {
        let state = AppState {
            chain: Arc::new(ChainPlan::from_targets(&config.targets)),
            client: UpstreamClient::new(&config.upstream)?,
            random,
        };

        let router = with_middleware(routes().with_state(state), telemetry);
        Ok(Self { router })
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "App listening at http://localhost:{}",
            addr.port()
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Route table, before state and middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::root))
        .route("/items/{item_id}", get(handlers::read_item))
        .route("/io_task", get(handlers::io_task))
        .route("/cpu_task", get(handlers::cpu_task))
        .route("/random_status", get(handlers::random_status))
        .route("/random_sleep", get(handlers::random_sleep))
        .route("/error_test", get(handlers::error_test))
        .route("/chain", get(handlers::chain))
        .fallback(handlers::not_found)
}

/// Wrap a router in the standard middleware stack. Outermost first:
/// request id assignment, trace span, id propagation, panic boundary.
pub fn with_middleware(router: Router, telemetry: &Telemetry) -> Router {
    let (set_request_id, propagate_request_id) = request_id_layers();
    router.layer(
        ServiceBuilder::new()
            .layer(set_request_id)
            .layer(trace_layer(telemetry))
            .layer(propagate_request_id)
            .layer(CatchPanicLayer::custom(panic_response)),
    )
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %detail, "Handler panicked");
    AppError::Handler("internal server error".to_string()).into_response()
}
