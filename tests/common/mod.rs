//! Shared utilities for integration tests.

use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Router;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use workload_demo::config::ServiceConfig;
use workload_demo::workload::RandomSource;
use workload_demo::{HttpServer, Shutdown, Telemetry};

/// Headers of interest on one request seen by a mock backend.
#[allow(dead_code)]
#[derive(Clone, Debug)]
pub struct SeenRequest {
    pub path: String,
    pub request_id: Option<String>,
    pub traceparent: Option<String>,
}

/// Requests seen by a mock backend, in arrival order.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct Recorded(Arc<Mutex<Vec<SeenRequest>>>);

#[allow(dead_code)]
impl Recorded {
    fn push(&self, seen: SeenRequest) {
        self.0.lock().unwrap().push(seen);
    }

    pub fn all(&self) -> Vec<SeenRequest> {
        self.0.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.all().into_iter().map(|s| s.path).collect()
    }

    pub fn request_ids(&self) -> Vec<Option<String>> {
        self.all().into_iter().map(|s| s.request_id).collect()
    }
}

/// Start a mock peer that records every request, waits `delay`, then answers `status`.
#[allow(dead_code)]
pub async fn start_recording_backend(status: u16, delay: Duration) -> (SocketAddr, Recorded) {
    let recorded = Recorded::default();
    let log = recorded.clone();
    let status = StatusCode::from_u16(status).unwrap();

    let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap| {
        let log = log.clone();
        async move {
            let header = |name: &str| {
                headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            log.push(SeenRequest {
                path: uri.path().to_string(),
                request_id: header("x-request-id"),
                traceparent: header("traceparent"),
            });
            tokio::time::sleep(delay).await;
            (status, "mock")
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, recorded)
}

/// Start the service on an ephemeral loopback port.
///
/// Every chain hop points back at the service itself unless `configure`
/// changes it.
#[allow(dead_code)]
pub async fn spawn_service<F>(
    configure: F,
    random: Arc<dyn RandomSource>,
) -> (SocketAddr, Shutdown)
where
    F: FnOnce(&mut ServiceConfig),
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = ServiceConfig::default().with_port(addr.port());
    config.listener.host = "127.0.0.1".to_string();
    config.targets.self_svc = addr.to_string();
    config.targets.target_one_svc = addr.to_string();
    config.targets.target_two_svc = addr.to_string();
    configure(&mut config);

    let telemetry = Telemetry::passive(&config.observability);
    let server = HttpServer::with_random(config, &telemetry, random).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
