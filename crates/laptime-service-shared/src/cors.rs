//! Cross-origin configuration for browser clients.
//!
//! `CORS_ALLOWED_ORIGINS` holds a comma-separated origin list. Unset, empty,
//! or `*` allows any origin without credentials; an explicit list allows
//! credentials for exactly those origins.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::middleware::REQUEST_ID_HEADER;

/// Which origins may call the service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AllowedOrigins {
    /// Any origin, credentials disabled.
    #[default]
    Any,
    /// Explicit origins, credentials enabled.
    List(Vec<String>),
}

impl AllowedOrigins {
    /// Parse a comma-separated origin list; `*` anywhere means any origin.
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(origins)
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub origins: AllowedOrigins,
}

impl CorsConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| AllowedOrigins::parse(&raw))
            .unwrap_or_default();
        Self { origins }
    }

    /// Whether browsers may send credentials.
    pub fn allows_credentials(&self) -> bool {
        matches!(self.origins, AllowedOrigins::List(_))
    }
}

/// Build the CORS layer for the router.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    match &config.origins {
        AllowedOrigins::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([REQUEST_ID_HEADER]),
        AllowedOrigins::List(origins) => {
            let values: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();

            // Wildcards are not allowed together with credentials.
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(values))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, REQUEST_ID_HEADER])
                .expose_headers([REQUEST_ID_HEADER])
                .allow_credentials(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_wildcard_and_empty() {
        assert_eq!(AllowedOrigins::parse("*"), AllowedOrigins::Any);
        assert_eq!(AllowedOrigins::parse(""), AllowedOrigins::Any);
        assert_eq!(AllowedOrigins::parse(" , "), AllowedOrigins::Any);
        assert_eq!(
            AllowedOrigins::parse("https://a.example, *"),
            AllowedOrigins::Any
        );
    }

    #[test]
    fn test_parse_origin_list() {
        let origins = AllowedOrigins::parse("https://pitwall.example/, http://localhost:8501");
        assert_eq!(
            origins,
            AllowedOrigins::List(vec![
                "https://pitwall.example".to_string(),
                "http://localhost:8501".to_string(),
            ])
        );
    }

    #[test]
    fn test_credentials_only_with_explicit_origins() {
        assert!(!CorsConfig::default().allows_credentials());

        let env: HashMap<&str, &str> = [("CORS_ALLOWED_ORIGINS", "http://localhost:8501")].into();
        let config = CorsConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert!(config.allows_credentials());
    }

    #[test]
    fn test_cors_layer_builds_for_both_modes() {
        let _ = cors_layer(&CorsConfig::default());
        let _ = cors_layer(&CorsConfig {
            origins: AllowedOrigins::List(vec![
                "http://localhost:8501".to_string(),
                "bad\norigin".to_string(),
            ]),
        });
    }
}
