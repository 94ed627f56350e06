//! Synthetic workload service.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │               WORKLOAD SERVICE               │
//!                        │                                              │
//!   Client Request       │  ┌──────────┐   ┌────────────┐   ┌────────┐  │
//!   ─────────────────────┼─▶│request id│──▶│ trace span │──▶│ router │  │
//!                        │  └──────────┘   └────────────┘   └───┬────┘  │
//!                        │                                      │       │
//!                        │      /  /items  /io_task  /cpu_task  │       │
//!                        │      /random_status  /random_sleep   ▼       │
//!                        │      /error_test            ┌──────────────┐ │
//!                        │                             │    /chain    │ │
//!                        │                             │ hop 1 → self │─┼──▶ peers
//!                        │                             │ hop 2 → one  │ │
//!                        │                             │ hop 3 → two  │ │
//!                        │                             └──────────────┘ │
//!                        └──────────────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;

use workload_demo::config::{ObservabilityConfig, ServiceConfig};
use workload_demo::http::HttpServer;
use workload_demo::lifecycle::{wait_for_signal, Shutdown};
use workload_demo::observability::Telemetry;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServiceConfig::from_env()?;

    // The OTLP exporter owns a blocking HTTP client, so it is built and
    // flushed outside the async runtime.
    let telemetry = start_telemetry(&config.observability);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(serve(config, telemetry.clone()));
    drop(runtime);

    telemetry.shutdown();
    result
}

/// Telemetry is best effort. An exporter failure falls back to local logs
/// only; any other failure leaves the service without a subscriber.
fn start_telemetry(config: &ObservabilityConfig) -> Telemetry {
    match Telemetry::init(config) {
        Ok(telemetry) => telemetry,
        Err(e) => {
            eprintln!("Error starting telemetry: {}", e);
            if config.otlp_endpoint.is_none() {
                return Telemetry::passive(config);
            }
            let local = ObservabilityConfig {
                otlp_endpoint: None,
                ..config.clone()
            };
            Telemetry::init(&local).unwrap_or_else(|e| {
                eprintln!("Error starting telemetry: {}", e);
                Telemetry::passive(config)
            })
        }
    }
}

async fn serve(
    config: ServiceConfig,
    telemetry: Telemetry,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address(),
        self_svc = %config.targets.self_svc,
        target_one = %config.targets.target_one_svc,
        target_two = %config.targets.target_two_svc,
        upstream_timeout_ms = ?config.upstream.timeout_ms,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(config.listener.bind_address()).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, &telemetry)?;
    let server_shutdown = shutdown.subscribe();

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        trigger.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
