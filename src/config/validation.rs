//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, the upstream URL and path prefixes
//! - Validate value ranges (timeouts > 0, limits > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `upstream.target`).
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if let Err(message) = check_target(&config.upstream.target) {
        errors.push(ValidationError::new("upstream.target", message));
    }

    let mount = &config.upstream.mount_prefix;
    if !mount.starts_with('/') {
        errors.push(ValidationError::new("upstream.mount_prefix", "must start with '/'"));
    } else if mount.len() > 1 && mount.ends_with('/') {
        errors.push(ValidationError::new("upstream.mount_prefix", "must not end with '/'"));
    }

    if !config.upstream.rewrite_to.starts_with('/') {
        errors.push(ValidationError::new("upstream.rewrite_to", "must start with '/'"));
    }

    if HeaderName::from_bytes(config.upstream.host_hint_header.as_bytes()).is_err() {
        errors.push(ValidationError::new(
            "upstream.host_hint_header",
            format!("'{}' is not a valid header name", config.upstream.host_hint_header),
        ));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be greater than 0"));
    }
    if config.timeouts.upstream_secs == Some(0) {
        errors.push(ValidationError::new("timeouts.upstream_secs", "must be greater than 0 when set"));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new("limits.max_body_bytes", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_target(target: &str) -> Result<(), String> {
    let url = Url::parse(target).map_err(|e| format!("'{}' is not a URL: {}", target, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("must not carry a query or fragment".to_string());
    }
    Ok(())
}
