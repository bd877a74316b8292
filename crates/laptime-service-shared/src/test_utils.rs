//! Test utilities for service handler testing.
//!
//! This module provides a stub model, ready-made states and fixture paths
//! for testing HTTP handlers without a trained artifact.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use laptime_lib::{FeatureVector, PredictiveModel, Result};
use serde_json::{json, Value};

use crate::state::AppState;

/// Path to the tree ensemble fixture artifact.
pub const TEST_FIXTURE_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../docs/fixtures/lap_time_model.json"
);

/// Estimate returned by [`StubModel`].
pub const STUB_LAP_TIME: f64 = 90.123;

/// Model that returns [`STUB_LAP_TIME`] for every input.
#[derive(Debug, Default)]
pub struct StubModel;

impl PredictiveModel for StubModel {
    fn estimate(&self, _features: &FeatureVector) -> Result<f64> {
        Ok(STUB_LAP_TIME)
    }

    fn kind(&self) -> &'static str {
        "stub"
    }
}

/// Lazily-initialized state loaded from the fixture artifact.
static FIXTURE_STATE: OnceLock<AppState> = OnceLock::new();

/// State backed by [`StubModel`].
pub fn test_state() -> AppState {
    AppState::from_model(Arc::new(StubModel))
}

/// Shared state loaded from the fixture artifact.
///
/// # Panics
///
/// Panics if the fixture cannot be loaded. This indicates a test
/// configuration issue.
pub fn fixture_state() -> AppState {
    FIXTURE_STATE
        .get_or_init(|| {
            let path = fixture_model_path();
            AppState::load(&path)
                .unwrap_or_else(|e| panic!("failed to load test fixture from {:?}: {}", path, e))
        })
        .clone()
}

/// State without a model.
pub fn unavailable_state() -> AppState {
    AppState::unavailable("model artifact not found: /nonexistent/model.json")
}

/// Get the absolute path to the fixture artifact.
pub fn fixture_model_path() -> PathBuf {
    PathBuf::from(TEST_FIXTURE_PATH)
}

/// The reference lap as a canonical request body.
pub fn sample_request_json() -> Value {
    json!({
        "lapNumber": 5,
        "tyreLife": 10,
        "sector1Time": 31.4,
        "sector2Time": 42.1,
        "sector3Time": 25.8,
        "compound": "Soft"
    })
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    format!("test-{}", uuid::Uuid::now_v7())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_path_exists() {
        let path = fixture_model_path();
        assert!(path.exists(), "fixture artifact not found at {:?}", path);
    }

    #[test]
    fn test_fixture_state_loads_successfully() {
        let state = fixture_state();
        assert!(state.is_ready());
        assert_eq!(
            state.model_info().map(|i| i.kind.as_str()),
            Some("tree_ensemble")
        );
    }

    #[test]
    fn test_stub_state_is_ready() {
        assert!(test_state().is_ready());
        assert!(!unavailable_state().is_ready());
    }

    #[test]
    fn test_request_id_unique() {
        assert_ne!(test_request_id(), test_request_id());
    }
}
