//! Prometheus metrics for the lap time service.
//!
//! [`init_metrics`] installs a global Prometheus recorder once at startup and
//! [`metrics_handler`] renders it. The `record_*` helpers are no-ops until a
//! recorder is installed, so handlers call them unconditionally.
//!
//! Prediction metrics:
//! - `laptime_predictions_total{compound}`
//! - `laptime_predictions_failed_total{kind}`
//! - `laptime_predicted_seconds` (histogram)
//!
//! ```no_run
//! use laptime_service_shared::metrics::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::from_env()).expect("metrics recorder installed");
//! ```

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

const PREDICTIONS_TOTAL: &str = "laptime_predictions_total";
const PREDICTIONS_FAILED_TOTAL: &str = "laptime_predictions_failed_total";
const PREDICTED_SECONDS: &str = "laptime_predicted_seconds";

/// Histogram buckets for predicted lap times, in seconds.
const LAP_TIME_BUCKETS: &[f64] = &[
    60.0, 70.0, 75.0, 80.0, 85.0, 90.0, 95.0, 100.0, 110.0, 120.0, 150.0,
];

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Metrics settings read from `METRICS_ENABLED` and `METRICS_PATH`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route serving the exposition text.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Only the literal `false` (any case) disables metrics.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            enabled: lookup("METRICS_ENABLED")
                .map(|v| !v.trim().eq_ignore_ascii_case("false"))
                .unwrap_or(defaults.enabled),
            path: lookup("METRICS_PATH")
                .filter(|p| p.starts_with('/'))
                .unwrap_or(defaults.path),
        }
    }
}

/// Errors from [`init_metrics`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum MetricsError {
    #[error("metrics are disabled")]
    Disabled,
    #[error("metrics recorder already initialized")]
    AlreadyInitialized,
    #[error("failed to install metrics recorder: {0}")]
    InstallFailed(String),
}

/// Install the global Prometheus recorder and describe the prediction metrics.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(PREDICTED_SECONDS.to_string()), LAP_TIME_BUCKETS)
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    describe_counter!(PREDICTIONS_TOTAL, "Predictions served, by compound");
    describe_counter!(
        PREDICTIONS_FAILED_TOTAL,
        "Predictions refused, by problem kind"
    );
    describe_histogram!(PREDICTED_SECONDS, Unit::Seconds, "Predicted lap times");
    Ok(())
}

/// `GET /metrics` in Prometheus exposition format.
pub async fn metrics_handler() -> String {
    match PROMETHEUS_HANDLE.get() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

pub fn record_prediction_served(compound: &str) {
    metrics::counter!(PREDICTIONS_TOTAL, "compound" => compound.to_string()).increment(1);
}

/// `kind` is one of the problem kinds, e.g. `unknown_compound`.
pub fn record_prediction_failed(kind: &str) {
    metrics::counter!(PREDICTIONS_FAILED_TOTAL, "kind" => kind.to_string()).increment(1);
}

pub fn record_predicted_lap_time(seconds: f64) {
    metrics::histogram!(PREDICTED_SECONDS).record(seconds);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> MetricsConfig {
        let env: HashMap<&str, &str> = pairs.iter().copied().collect();
        MetricsConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()))
    }

    #[test]
    fn enabled_unless_explicitly_false() {
        assert!(config_from(&[]).enabled);
        assert!(config_from(&[("METRICS_ENABLED", "yes")]).enabled);
        assert!(!config_from(&[("METRICS_ENABLED", " FALSE ")]).enabled);
    }

    #[test]
    fn path_must_be_absolute() {
        assert_eq!(config_from(&[("METRICS_PATH", "/prom")]).path, "/prom");
        assert_eq!(config_from(&[("METRICS_PATH", "prom")]).path, "/metrics");
    }

    #[test]
    fn disabled_config_installs_nothing() {
        let config = config_from(&[("METRICS_ENABLED", "false")]);
        assert!(matches!(init_metrics(&config), Err(MetricsError::Disabled)));
    }

    #[test]
    fn lap_time_buckets_are_sorted() {
        assert!(LAP_TIME_BUCKETS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn recording_without_recorder_is_harmless() {
        record_prediction_served("Soft");
        record_prediction_failed("unknown_compound");
        record_predicted_lap_time(90.123);
    }

    #[tokio::test]
    async fn handler_renders_placeholder_without_recorder() {
        assert_eq!(metrics_handler().await, "# Metrics not initialized\n");
    }
}
