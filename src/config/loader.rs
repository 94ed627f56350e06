//! Configuration loading from the environment.

use std::env;
use thiserror::Error;

use crate::config::schema::{LogFormat, ServiceConfig, TargetsConfig};
use crate::config::validation::{validate_config, ValidationError};

pub const EXPOSE_HOST: &str = "EXPOSE_HOST";
pub const EXPOSE_PORT: &str = "EXPOSE_PORT";
pub const TARGET_ONE_SVC: &str = "TARGET_ONE_SVC";
pub const TARGET_TWO_SVC: &str = "TARGET_TWO_SVC";
pub const OTEL_SERVICE_NAME: &str = "OTEL_SERVICE_NAME";
pub const OTEL_EXPORTER_OTLP_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
pub const UPSTREAM_TIMEOUT_MS: &str = "UPSTREAM_TIMEOUT_MS";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const LOG_FORMAT: &str = "LOG_FORMAT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ServiceConfig {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first when present;
    /// variables already set in the environment take precedence over it.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = ServiceConfig::default();

        if let Some(host) = get(EXPOSE_HOST) {
            config.listener.host = host;
        }
        if let Some(raw) = get(EXPOSE_PORT) {
            config.listener.port = parse_value(EXPOSE_PORT, &raw)?;
        }

        let local = TargetsConfig::for_listener(&config.listener);
        config.targets = TargetsConfig {
            self_svc: local.self_svc,
            target_one_svc: get(TARGET_ONE_SVC).unwrap_or(local.target_one_svc),
            target_two_svc: get(TARGET_TWO_SVC).unwrap_or(local.target_two_svc),
        };

        if let Some(raw) = get(UPSTREAM_TIMEOUT_MS) {
            config.upstream.timeout_ms = Some(parse_value(UPSTREAM_TIMEOUT_MS, &raw)?);
        }

        if let Some(name) = get(OTEL_SERVICE_NAME) {
            config.observability.service_name = name;
        }
        config.observability.otlp_endpoint = get(OTEL_EXPORTER_OTLP_ENDPOINT);
        if let Some(level) = get(LOG_LEVEL) {
            config.observability.log_level = level;
        }
        if let Some(raw) = get(LOG_FORMAT) {
            config.observability.log_format = parse_value::<LogFormat>(LOG_FORMAT, &raw)?;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;

        Ok(config)
    }
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
