//! Configuration for the Scrapflow workflow engine
//!
//! None of these settings reach the guardrails or evidence protection;
//! they only tune field-level checks and logging.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub validation: ValidationConfig,
    pub resolution: ResolutionConfig,
    pub telemetry: TelemetryConfig,
}

impl EngineConfig {
    /// Parse a TOML document; missing sections keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

/// Field-level checks applied when a level record is submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    pub enforce_required_fields: bool,
    pub enforce_photo_counts: bool,
    pub warn_on_unconfigured_fields: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enforce_required_fields: true,
            enforce_photo_counts: true,
            warn_on_unconfigured_fields: true,
        }
    }
}

/// Which configuration version a transaction is validated against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolutionConfig {
    /// Resolve fields as they were when the transaction was created
    pub pin_to_transaction_creation: bool,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            pin_to_transaction_creation: true,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetryConfig {
    /// `tracing-subscriber` filter directives, overridden by `RUST_LOG`
    pub log_filter: String,
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.validation.enforce_required_fields);
        assert!(config.validation.enforce_photo_counts);
        assert!(config.resolution.pin_to_transaction_creation);
        assert_eq!(config.telemetry.log_filter, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [validation]
            enforce_photo_counts = false

            [telemetry]
            log_filter = "scrapflow_engine=debug"
            "#,
        )
        .unwrap();
        assert!(!config.validation.enforce_photo_counts);
        assert!(config.validation.enforce_required_fields);
        assert!(config.resolution.pin_to_transaction_creation);
        assert_eq!(config.telemetry.log_filter, "scrapflow_engine=debug");
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = EngineConfig::from_toml_str(
            r#"
            [guardrails]
            disabled = true
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = EngineConfig::load("/definitely/not/here/scrapflow.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
