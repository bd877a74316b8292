//! Service configuration read from the environment.

use std::path::PathBuf;

use crate::cors::CorsConfig;

/// Default location of the model artifact.
pub const DEFAULT_MODEL_PATH: &str = "models/lap_time_model.json";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Startup configuration for the HTTP service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Path to the JSON model artifact (`LAPTIME_MODEL_PATH`).
    pub model_path: PathBuf,
    /// Listening port (`SERVICE_PORT`).
    pub port: u16,
    /// Exit at startup when the model cannot be loaded (`LAPTIME_REQUIRE_MODEL`).
    pub require_model: bool,
    /// Cross-origin settings (`CORS_ALLOWED_ORIGINS`).
    pub cors: CorsConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            port: DEFAULT_PORT,
            require_model: false,
            cors: CorsConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// Unparseable ports fall back to the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let model_path = lookup("LAPTIME_MODEL_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));

        let port = match lookup("SERVICE_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid SERVICE_PORT, using {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let require_model = lookup("LAPTIME_REQUIRE_MODEL")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        Self {
            model_path,
            port,
            require_model,
            cors: CorsConfig::from_lookup(&lookup),
        }
    }
}
