//! Structured logging and Prometheus metrics setup.

use std::fmt;
use std::str::FromStr;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::AppError;

/// Output format of log records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per record.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Installs the global tracing subscriber.
///
/// `level` is an `EnvFilter` directive such as `info` or
/// `domain=debug,catalog_store=warn`. Fails if a subscriber is already set.
pub fn init_tracing(level: &str, format: LogFormat) -> Result<(), AppError> {
    let filter = EnvFilter::try_new(level).map_err(|e| AppError::Telemetry(e.to_string()))?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };
    result.map_err(|e| AppError::Telemetry(e.to_string()))
}

/// Installs the global Prometheus recorder and returns the handle used to
/// render the current metrics.
pub fn init_metrics() -> Result<PrometheusHandle, AppError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| AppError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" JSON ".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
        assert_eq!(LogFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        let result = init_tracing("catalog=loudest", LogFormat::Pretty);
        assert!(matches!(result, Err(AppError::Telemetry(_))));
    }
}
