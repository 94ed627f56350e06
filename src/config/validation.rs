//! Configuration validation.
//!
//! Serde and the loader handle syntax; this module checks that target
//! authorities are usable `host` or `host:port` values. All problems are reported at
//! once rather than stopping at the first.

use std::fmt;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a resolved configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError {
            field: "EXPOSE_HOST",
            message: "must not be empty".to_string(),
        });
    }

    let targets = [
        ("TARGET_ONE_SVC", &config.targets.target_one_svc),
        ("TARGET_TWO_SVC", &config.targets.target_two_svc),
    ];
    for (field, authority) in targets {
        if let Err(message) = check_authority(authority) {
            errors.push(ValidationError { field, message });
        }
    }

    if config.upstream.timeout_ms == Some(0) {
        errors.push(ValidationError {
            field: "UPSTREAM_TIMEOUT_MS",
            message: "must be greater than zero".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Accept `host` or `host:port`; no scheme or path. A bare host means port 80.
fn check_authority(authority: &str) -> Result<(), String> {
    if authority.contains("://") || authority.contains('/') {
        return Err(format!("'{}' must be host[:port] without scheme or path", authority));
    }
    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) if !authority.ends_with(']') => (host, Some(port)),
        _ => (authority, None),
    };
    if host.trim().is_empty() {
        return Err(format!("'{}' is missing a host", authority));
    }
    match port {
        Some(port) if port.parse::<u16>().is_err() => {
            Err(format!("'{}' has an invalid port", authority))
        }
        _ => Ok(()),
    }
}
