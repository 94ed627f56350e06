//! Structured logging and trace export setup.

use opentelemetry_otlp::ExporterBuildError;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::{
    filter::ParseError, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
    EnvFilter,
};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::observability::otel;

/// Telemetry could not be initialized.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid log filter '{directive}': {source}")]
    Filter {
        directive: String,
        #[source]
        source: ParseError,
    },

    #[error("failed to build OTLP exporter: {0}")]
    Exporter(#[from] ExporterBuildError),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

/// Handle produced by telemetry initialization.
///
/// Carries the identity attached to request spans and, when exporting, the
/// tracer provider that must be flushed on exit. Cloning is cheap.
#[derive(Clone)]
pub struct Telemetry {
    service_name: Arc<str>,
    provider: Option<SdkTracerProvider>,
}

impl fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telemetry")
            .field("service_name", &self.service_name)
            .field("exporting", &self.provider.is_some())
            .finish()
    }
}

impl Telemetry {
    /// Install the global subscriber, exporting spans over OTLP when an
    /// endpoint is configured.
    ///
    /// `RUST_LOG` takes precedence over the configured level. Fails if the
    /// level directive is malformed, the exporter cannot be built, or a
    /// subscriber is already installed. Must run outside the async runtime.
    pub fn init(config: &ObservabilityConfig) -> Result<Self, StartupError> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&config.log_level).map_err(|source| {
                StartupError::Filter {
                    directive: config.log_level.clone(),
                    source,
                }
            })?,
        };

        let provider = match config.otlp_endpoint.as_deref() {
            Some(endpoint) => Some(otel::tracer_provider(&config.service_name, Some(endpoint))?),
            None => None,
        };
        let otel_layer = provider
            .as_ref()
            .map(|provider| otel::layer(provider, &config.service_name));

        let (json, pretty) = match config.log_format {
            LogFormat::Json => (
                Some(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(false),
                ),
                None,
            ),
            LogFormat::Pretty => (None, Some(tracing_subscriber::fmt::layer())),
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(json)
            .with(pretty)
            .with(otel_layer)
            .try_init()?;

        otel::install_propagator();

        let telemetry = Self {
            service_name: Arc::from(config.service_name.as_str()),
            provider,
        };

        tracing::info!(
            service.name = %telemetry.service_name,
            otlp_endpoint = ?config.otlp_endpoint,
            log_format = %config.log_format,
            "Telemetry initialized"
        );

        Ok(telemetry)
    }

    /// Handle without a subscriber or exporter. Used when `init` fails and in tests.
    pub fn passive(config: &ObservabilityConfig) -> Self {
        Self {
            service_name: Arc::from(config.service_name.as_str()),
            provider: None,
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Flush buffered spans and stop the exporter.
    pub fn shutdown(&self) {
        if let Some(provider) = &self.provider {
            if let Err(e) = provider.shutdown() {
                eprintln!("Error shutting down trace exporter: {}", e);
            }
        }
    }
}
