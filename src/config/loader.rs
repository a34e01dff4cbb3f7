//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    let config: ProxyConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LogFormat, DEFAULT_TARGET};

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.upstream.target, DEFAULT_TARGET);
        assert_eq!(config.upstream.mount_prefix, "/api/proxy");
        assert_eq!(config.upstream.rewrite_to, "/api/dt");
        assert_eq!(config.timeouts.upstream_secs, None);
    }

    #[test]
    fn test_partial_sections() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "0.0.0.0:4000"

            [upstream]
            target = "http://localhost:7071"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:4000");
        assert_eq!(config.upstream.target, "http://localhost:7071");
        // untouched fields keep their defaults
        assert_eq!(config.upstream.host_hint_header, "x-adt-host");
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_example_file_parses() {
        let config = parse_config(include_str!("../../adt-dev-proxy.example.toml")).unwrap();
        assert_eq!(config.upstream.target, DEFAULT_TARGET);
        assert_eq!(config.limits.max_body_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[listener\nbind_address = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let err = parse_config("[timeouts]\nconnect_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert_eq!(
            err.to_string(),
            "Validation failed: timeouts.connect_secs: must be greater than 0"
        );
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
