//! Structured logging for the lap time service.
//!
//! Settings come from `LOG_FORMAT` (`json` default, `text`/`pretty`),
//! `RUST_LOG` (default `info`) and `SERVICE_NAME`. JSON output flattens event
//! fields and carries the current span, so every line emitted while handling a
//! request includes its `request_id`.
//!
//! ```no_run
//! use laptime_service_shared::logging::{init_logging, LoggingConfig};
//!
//! init_logging(&LoggingConfig::from_env().with_service("laptime"))
//!     .expect("logging initialized once");
//! ```

use serde::{Deserialize, Serialize};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

const DEFAULT_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    /// Multi-line human-readable output for local runs.
    Text,
}

impl LogFormat {
    /// `text` and `pretty` select [`LogFormat::Text`]; anything else is JSON.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives, e.g. `info,laptime_lib=debug`.
    pub level: String,
    pub service: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: DEFAULT_LEVEL.to_string(),
            service: None,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            format: lookup("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
            level: lookup("RUST_LOG")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
            service: lookup("SERVICE_NAME"),
        }
    }

    /// Fallback service name; `SERVICE_NAME` wins when set.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service.get_or_insert_with(|| service.into());
        self
    }

    /// Filter for the configured directives. Unparseable directives fall back
    /// to `info`.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let output = match config.format {
        LogFormat::Text => fmt::layer().pretty().boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(output)
        .with(config.env_filter())
        .try_init()?;

    tracing::info!(
        service = config.service.as_deref().unwrap_or("laptime"),
        format = ?config.format,
        filter = %config.level,
        "logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> LoggingConfig {
        let env: HashMap<&str, &str> = pairs.iter().copied().collect();
        LoggingConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()))
    }

    #[test]
    fn parse_accepts_text_aliases() {
        assert_eq!(LogFormat::parse("TEXT"), LogFormat::Text);
        assert_eq!(LogFormat::parse(" pretty "), LogFormat::Text);
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("yaml"), LogFormat::Json);
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");
        assert!(config.service.is_none());
    }

    #[test]
    fn environment_overrides() {
        let config = config_from(&[("LOG_FORMAT", "text"), ("RUST_LOG", "debug")]);
        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(config.level, "debug");

        let blank = config_from(&[("RUST_LOG", "  ")]);
        assert_eq!(blank.level, "info");
    }

    #[test]
    fn service_name_from_environment_wins() {
        let config = config_from(&[("SERVICE_NAME", "laptime-eu")]).with_service("laptime");
        assert_eq!(config.service.as_deref(), Some("laptime-eu"));

        let config = LoggingConfig::default().with_service("laptime");
        assert_eq!(config.service.as_deref(), Some("laptime"));
    }

    #[test]
    fn invalid_directives_fall_back() {
        let config = LoggingConfig {
            level: "laptime=notalevel".to_string(),
            ..LoggingConfig::default()
        };
        // Builds without panicking.
        let _ = config.env_filter();
    }
}
