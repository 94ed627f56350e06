//! Log records emitted by the workload routes.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use tracing::Level;
use workload_demo::config::ServiceConfig;
use workload_demo::workload::ScriptedRandom;
use workload_demo::{HttpServer, Telemetry};

mod common;

const SERVICE: &str = "log-test";

/// In-memory sink for JSON log lines.
#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Buffer {
    fn records(&self) -> Vec<Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn find(&self, message: &str) -> Value {
        self.records()
            .into_iter()
            .find(|r| r["fields"]["message"] == message)
            .unwrap_or_else(|| panic!("no record with message {:?}", message))
    }
}

fn capture() -> (Buffer, tracing::subscriber::DefaultGuard) {
    let buffer = Buffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_max_level(Level::TRACE)
        .with_writer(move || writer.clone())
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}

fn router(configure: impl FnOnce(&mut ServiceConfig), random: Vec<usize>) -> Router {
    let mut config = ServiceConfig::default();
    config.observability.service_name = SERVICE.to_string();
    configure(&mut config);
    let telemetry = Telemetry::passive(&config.observability);
    HttpServer::with_random(config, &telemetry, Arc::new(ScriptedRandom::new(random)))
        .unwrap()
        .router()
}

async fn get(router: Router, uri: &str) -> StatusCode {
    router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

fn assert_in_request_span(record: &Value) {
    assert_eq!(record["span"]["name"], "request");
    assert_eq!(record["span"]["service.name"], SERVICE);
    assert!(record["span"]["request_id"].is_string());
}

#[tokio::test]
async fn root_and_items_log_info() {
    let (logs, _guard) = capture();
    let router = router(|_| {}, vec![0]);

    get(router.clone(), "/").await;
    get(router, "/items/42?q=shoes").await;

    let root = logs.find("Root endpoint called");
    assert_eq!(root["level"], "INFO");
    assert_in_request_span(&root);

    let item = logs.find("Item endpoint called");
    assert_eq!(item["level"], "INFO");
    assert_eq!(item["fields"]["item_id"], "42");
    assert!(item["fields"]["query"].as_str().unwrap().contains("shoes"));
    assert_in_request_span(&item);
}

#[tokio::test]
async fn random_status_logs_warning_with_status() {
    let (logs, _guard) = capture();

    assert_eq!(get(router(|_| {}, vec![3]), "/random_status").await.as_u16(), 400);

    let record = logs.find("Random status endpoint called");
    assert_eq!(record["level"], "WARN");
    assert_eq!(record["fields"]["status"], 400);
    assert_in_request_span(&record);
}

#[tokio::test]
async fn random_sleep_logs_chosen_delay() {
    let (logs, _guard) = capture();

    get(router(|_| {}, vec![0]), "/random_sleep").await;

    let record = logs.find("Random sleep endpoint finished");
    assert_eq!(record["level"], "INFO");
    assert_eq!(record["fields"]["sleep_time"], 0);
    assert_in_request_span(&record);
}

#[tokio::test]
async fn cpu_and_io_tasks_log_completion() {
    let (logs, _guard) = capture();
    let router = router(|_| {}, vec![0]);

    get(router.clone(), "/cpu_task").await;
    get(router, "/io_task").await;

    for message in ["CPU bound task finished", "IO bound task finished"] {
        let record = logs.find(message);
        assert_eq!(record["level"], "INFO");
        assert_in_request_span(&record);
    }
}

#[tokio::test]
async fn error_test_logs_error_before_failing() {
    let (logs, _guard) = capture();

    assert_eq!(
        get(router(|_| {}, vec![0]), "/error_test").await,
        StatusCode::INTERNAL_SERVER_ERROR
    );

    let record = logs.find("Error test endpoint encountered an error");
    assert_eq!(record["level"], "ERROR");
    assert_in_request_span(&record);
}

#[tokio::test]
async fn chain_logs_start_hops_and_finish() {
    let (logs, _guard) = capture();
    let (peer, _) = common::start_recording_backend(200, Duration::ZERO).await;
    let router = router(
        |config| {
            config.targets.self_svc = peer.to_string();
            config.targets.target_one_svc = peer.to_string();
            config.targets.target_two_svc = peer.to_string();
        },
        vec![0],
    );

    assert_eq!(get(router, "/chain").await, StatusCode::OK);

    let start = logs.find("Chain endpoint started");
    assert_eq!(start["level"], "INFO");
    assert_in_request_span(&start);

    let finish = logs.find("Chain endpoint finished");
    assert_eq!(finish["level"], "INFO");
    assert_eq!(finish["fields"]["hops"], 3);
    assert_in_request_span(&finish);

    let hops: Vec<Value> = logs
        .records()
        .into_iter()
        .filter(|r| r["fields"]["message"] == "Chain hop completed")
        .collect();
    let numbers: Vec<u64> = hops
        .iter()
        .map(|r| r["fields"]["hop"].as_u64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(hops.iter().all(|r| r["fields"]["status"] == 200));
}

#[tokio::test]
async fn failed_chain_logs_aborted_hop() {
    let (logs, _guard) = capture();
    let router = router(
        |config| config.targets.self_svc = "127.0.0.1:1".to_string(),
        vec![0],
    );

    assert_eq!(get(router, "/chain").await, StatusCode::BAD_GATEWAY);

    let record = logs.find("Chain aborted");
    assert_eq!(record["level"], "ERROR");
    assert_eq!(record["fields"]["hop"], 1);
    assert!(logs
        .records()
        .iter()
        .all(|r| r["fields"]["message"] != "Chain endpoint finished"));
}
