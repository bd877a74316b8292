//! Liveness and readiness probes.
//!
//! `/health/live` answers as long as the process can serve HTTP.
//! `/health/ready` additionally requires a loaded model, so an instance that
//! started without one is taken out of rotation while still reporting why.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use laptime_lib::ModelInfo;

use crate::AppState;

const SERVICE: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Overall probe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeState {
    Ok,
    NotReady,
}

/// Summary of the served model, reported by the readiness probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_count: Option<usize>,
    pub loaded_at: String,
}

impl From<&ModelInfo> for ModelSummary {
    fn from(info: &ModelInfo) -> Self {
        Self {
            kind: info.kind.clone(),
            tree_count: info.tree_count,
            loaded_at: info.loaded_at.clone(),
        }
    }
}

/// Body of both health probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: ProbeState,
    pub service: String,
    pub version: String,

    /// Present on readiness responses when a model is serving.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelSummary>,

    /// Present when not ready.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl HealthStatus {
    fn base(status: ProbeState) -> Self {
        Self {
            status,
            service: SERVICE.to_string(),
            version: VERSION.to_string(),
            model: None,
            reason: None,
        }
    }

    /// The process is up.
    pub fn alive() -> Self {
        Self::base(ProbeState::Ok)
    }

    /// A model is loaded and predictions are served.
    pub fn ready(info: &ModelInfo) -> Self {
        Self {
            model: Some(ModelSummary::from(info)),
            ..Self::base(ProbeState::Ok)
        }
    }

    /// No model; predictions are refused.
    pub fn not_ready(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::base(ProbeState::NotReady)
        }
    }

    /// Inspect `state` for the readiness probe.
    pub fn probe(state: &AppState) -> Self {
        match state.model_info() {
            Some(info) if state.is_ready() => Self::ready(info),
            _ => Self::not_ready("model not loaded"),
        }
    }

    /// HTTP status matching this probe outcome.
    pub fn http_status(&self) -> StatusCode {
        match self.status {
            ProbeState::Ok => StatusCode::OK,
            ProbeState::NotReady => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for HealthStatus {
    fn into_response(self) -> Response {
        (self.http_status(), Json(self)).into_response()
    }
}

/// `GET /health/live`.
pub async fn health_live() -> HealthStatus {
    HealthStatus::alive()
}

/// `GET /health/ready`.
///
/// The load failure cause stays in the logs; the probe only says the model
/// is missing.
pub async fn health_ready(State(state): State<AppState>) -> HealthStatus {
    HealthStatus::probe(&state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> ModelInfo {
        ModelInfo {
            kind: "tree_ensemble".to_string(),
            feature_names: Vec::new(),
            source: None,
            tree_count: Some(3),
            loaded_at: "2026-10-18T10:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn alive_has_no_model_section() {
        let json = serde_json::to_value(HealthStatus::alive()).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], SERVICE);
        assert!(json.get("model").is_none());
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn ready_reports_model_summary() {
        let status = HealthStatus::ready(&info());
        assert_eq!(status.http_status(), StatusCode::OK);
        let model = status.model.expect("model summary");
        assert_eq!(model.kind, "tree_ensemble");
        assert_eq!(model.tree_count, Some(3));
    }

    #[test]
    fn not_ready_is_503_with_reason() {
        let status = HealthStatus::not_ready("model not loaded");
        assert_eq!(status.http_status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "not_ready");
        assert_eq!(json["reason"], "model not loaded");
    }

    #[tokio::test]
    async fn readiness_follows_state() {
        let status = health_ready(State(AppState::unavailable("missing"))).await;
        assert_eq!(status.status, ProbeState::NotReady);
        assert!(status.model.is_none());
    }
}
