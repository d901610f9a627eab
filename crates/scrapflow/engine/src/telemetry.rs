//! Tracing setup for hosts embedding the engine.

use crate::config::TelemetryConfig;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` wins over `config.log_filter` when set. Returns
/// `AlreadyInitialized` if something else installed a subscriber first.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let configured =
        EnvFilter::try_new(&config.log_filter).map_err(|e| TelemetryError::InvalidFilter {
            filter: config.log_filter.clone(),
            reason: e.to_string(),
        })?;
    let filter = EnvFilter::try_from_default_env().unwrap_or(configured);

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    installed.map_err(|_| TelemetryError::AlreadyInitialized)
}
