//! Logging setup
//!
//! Structured logging via `tracing-subscriber`, in JSON or plain text.
//! `RUST_LOG` takes precedence over the configured level.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Logging error types
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    #[error("Initialization error: {0}")]
    InitError(String),
}

/// Log output format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human-readable lines
    #[default]
    Text,
}

/// Build the filter, preferring `RUST_LOG` when it is set.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidFilter {
        filter: level.to_string(),
        message: e.to_string(),
    })
}

/// Install the global subscriber. Logs go to stderr so stdout stays parseable.
pub fn init_logging(level: &str, format: LogFormat) -> Result<(), LoggingError> {
    let env_filter = build_filter(level)?;

    let result = match format {
        LogFormat::Json => Registry::default()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => Registry::default()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| LoggingError::InitError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_serde() {
        let fmt: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(fmt, LogFormat::Json);
        assert_eq!(serde_json::to_string(&LogFormat::Text).unwrap(), "\"text\"");
    }

    #[test]
    fn test_invalid_filter_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = build_filter("whatsapp=loudest").unwrap_err();
        assert!(matches!(err, LoggingError::InvalidFilter { .. }));
    }

    #[test]
    fn test_second_init_fails() {
        let _ = init_logging("warn", LogFormat::Text);
        assert!(init_logging("warn", LogFormat::Json).is_err());
    }
}
