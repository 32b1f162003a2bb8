//! Telemetry setup: structured logging and Prometheus metrics.
//!
//! - **Tracing**: `EnvFilter` plus a JSON or compact human-readable fmt layer
//! - **Metrics**: Prometheus recorder whose handle renders the `/metrics` body

use tracing::Level;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub use metrics_exporter_prometheus::PrometheusHandle;

/// Telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub log_level: String,
    /// Use JSON log format
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "INFO".to_string(),
            json_logs: false,
        }
    }
}

/// Errors raised while installing telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log directive: {0}")]
    Directive(#[from] tracing_subscriber::filter::ParseError),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),

    #[error("failed to install Prometheus recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Map a case-insensitive level name to a tracing level; unknown names mean INFO.
#[must_use]
#[allow(clippy::match_same_arms)]
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_uppercase().as_str() {
        "TRACE" => Level::TRACE,
        "DEBUG" => Level::DEBUG,
        "WARN" => Level::WARN,
        "ERROR" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initialize the Prometheus recorder and return the handle for the /metrics endpoint.
///
/// # Errors
/// Fails if a global recorder is already installed.
pub fn init_metrics() -> Result<PrometheusHandle, TelemetryError> {
    Ok(metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?)
}

/// Install the global tracing subscriber.
///
/// # Errors
/// Fails if a directive does not parse or a global subscriber is already set.
pub fn setup_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let level = parse_level(&config.log_level);

    let env_filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("mongodb=warn".parse()?)
        .add_directive("tower=info".parse()?)
        .add_directive("h2=info".parse()?)
        .add_directive("hyper=info".parse()?);

    let fmt_layer = if config.json_logs {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_timer(ChronoLocal::new("%H:%M:%S%.3f".to_string()))
            .compact()
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_logs_info_in_compact_format() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_level, "INFO");
        assert!(!config.json_logs);
    }

    #[test]
    fn level_names_are_case_insensitive() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" Warn "), Level::WARN);
        assert_eq!(parse_level("verbose"), Level::INFO);
    }
}
