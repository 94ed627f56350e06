//! Configuration schema definitions.
//!
//! All types derive Serde traits so a resolved configuration can be dumped
//! as JSON at startup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Port used when `EXPOSE_PORT` is not set.
pub const DEFAULT_PORT: u16 = 3000;

/// Service name used when `OTEL_SERVICE_NAME` is not set.
pub const DEFAULT_SERVICE_NAME: &str = "nodejs-app_default";

/// Root configuration for the workload service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Downstream services visited by `/chain`.
    pub targets: TargetsConfig,

    /// Outbound HTTP client settings.
    pub upstream: UpstreamConfig,

    /// Logging and telemetry settings.
    pub observability: ObservabilityConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let listener = ListenerConfig::default();
        let targets = TargetsConfig::local(listener.port);
        Self {
            listener,
            targets,
            upstream: UpstreamConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Rebind to `port`, pointing every target that still references the old
    /// local port at the new one.
    pub fn with_port(mut self, port: u16) -> Self {
        let old = TargetsConfig::for_listener(&self.listener);
        let new = TargetsConfig::for_listener(&ListenerConfig {
            port,
            ..self.listener.clone()
        });
        if self.targets.self_svc == old.self_svc {
            self.targets.self_svc = new.self_svc;
        }
        if self.targets.target_one_svc == old.target_one_svc {
            self.targets.target_one_svc = new.target_one_svc;
        }
        if self.targets.target_two_svc == old.target_two_svc {
            self.targets.target_two_svc = new.target_two_svc;
        }
        self.listener.port = port;
        self
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host or IP to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port to listen on.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Authority at which this instance reaches itself.
    ///
    /// Wildcard binds are reached through `localhost`; a specific interface
    /// is reached at its own address.
    pub fn local_authority(&self) -> String {
        match self.host.trim() {
            "" | "0.0.0.0" | "::" | "[::]" => format!("localhost:{}", self.port),
            host if host.contains(':') && !host.starts_with('[') => {
                format!("[{}]:{}", host, self.port)
            }
            host => format!("{}:{}", host, self.port),
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// `host:port` authorities for each `/chain` hop.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TargetsConfig {
    /// Hop 1: this service's own root.
    pub self_svc: String,

    /// Hop 2: receives `/io_task`.
    pub target_one_svc: String,

    /// Hop 3: receives `/cpu_task`.
    pub target_two_svc: String,
}

impl TargetsConfig {
    /// All three hops pointing at `localhost:<port>`.
    pub fn local(port: u16) -> Self {
        Self::for_listener(&ListenerConfig {
            port,
            ..ListenerConfig::default()
        })
    }

    /// All three hops pointing back at `listener`.
    pub fn for_listener(listener: &ListenerConfig) -> Self {
        let authority = listener.local_authority();
        Self {
            self_svc: authority.clone(),
            target_one_svc: authority.clone(),
            target_two_svc: authority,
        }
    }
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self::local(DEFAULT_PORT)
    }
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Whole-request timeout for each hop in milliseconds. `None` waits indefinitely.
    pub timeout_ms: Option<u64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Logical service name attached to every request span.
    pub service_name: String,

    /// Telemetry export endpoint, consumed by the external exporter.
    pub otlp_endpoint: Option<String>,

    /// Log level directive (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Output format for log records.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            otlp_endpoint: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
        }
    }
}

/// Log record format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable output for local development.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => f.write_str("json"),
            LogFormat::Pretty => f.write_str("pretty"),
        }
    }
}
