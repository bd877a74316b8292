//! Application state for the HTTP service.
//!
//! This module provides the shared state structure that axum handlers use to
//! reach the prediction service and the metadata of the loaded model.

use std::path::Path;
use std::sync::Arc;

use laptime_lib::{
    load_model, Error as LibError, LoadedModel, ModelHandle, ModelInfo, PredictionService,
    PredictiveModel, FEATURE_NAMES,
};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Model artifact file not found.
    ModelNotFound(String),

    /// Model artifact exists but could not be loaded.
    ModelLoad(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ModelNotFound(path) => write!(f, "model artifact not found: {}", path),
            Self::ModelLoad(e) => write!(f, "failed to load model: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ModelLoad(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        match err {
            LibError::ModelNotFound { path } => Self::ModelNotFound(path.display().to_string()),
            other => Self::ModelLoad(other),
        }
    }
}

/// Shared application state for all axum handlers.
///
/// This struct is cheaply cloneable (using `Arc` internally) and should be
/// shared via axum's `State` extractor. The model is loaded once and never
/// mutated, so handlers use it concurrently without locking.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::post, extract::State};
/// use laptime_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let service = state.prediction_service();
///     // ... predict
/// }
///
/// let state = AppState::load("models/lap_time_model.json").unwrap();
/// let app = Router::new()
///     .route("/api/v1/predict", post(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    service: PredictionService,
    model_info: Option<ModelInfo>,
    unavailable_reason: Option<String>,
}

impl AppState {
    /// Load application state from a model artifact.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path to the JSON model artifact
    ///
    /// # Returns
    ///
    /// Returns an `AppState` on success, or an `AppStateError` if loading fails.
    /// Callers that want to keep serving without a model use
    /// [`AppState::unavailable`] with the error.
    pub fn load(model_path: impl AsRef<Path>) -> Result<Self, AppStateError> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            return Err(AppStateError::ModelNotFound(
                model_path.display().to_string(),
            ));
        }

        let loaded = load_model(model_path)?;
        Ok(Self::from_loaded(loaded))
    }

    /// Create application state from a model that has already been loaded.
    pub fn from_loaded(loaded: LoadedModel) -> Self {
        let info = loaded.info.clone();
        Self {
            inner: Arc::new(AppStateInner {
                service: PredictionService::new(ModelHandle::from(loaded)),
                model_info: Some(info),
                unavailable_reason: None,
            }),
        }
    }

    /// Create application state around any model implementation.
    ///
    /// This is useful for testing with stub models.
    pub fn from_model(model: Arc<dyn PredictiveModel>) -> Self {
        let info = ModelInfo {
            kind: model.kind().to_string(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            source: None,
            tree_count: None,
            loaded_at: chrono::Utc::now().to_rfc3339(),
        };
        Self {
            inner: Arc::new(AppStateInner {
                service: PredictionService::new(ModelHandle::loaded(model)),
                model_info: Some(info),
                unavailable_reason: None,
            }),
        }
    }

    /// Create application state without a model.
    ///
    /// Every prediction is refused with `model_unavailable` and the readiness
    /// probe reports not ready.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            inner: Arc::new(AppStateInner {
                service: PredictionService::new(ModelHandle::unavailable(reason.clone())),
                model_info: None,
                unavailable_reason: Some(reason),
            }),
        }
    }

    /// Access the prediction service.
    pub fn prediction_service(&self) -> &PredictionService {
        &self.inner.service
    }

    /// Metadata of the loaded model, if any.
    pub fn model_info(&self) -> Option<&ModelInfo> {
        self.inner.model_info.as_ref()
    }

    /// Check if a model is loaded and predictions can be served.
    pub fn is_ready(&self) -> bool {
        self.inner.service.is_ready()
    }

    /// Why the model is unavailable, when it is.
    pub fn unavailable_reason(&self) -> Option<&str> {
        self.inner.unavailable_reason.as_deref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("ready", &self.is_ready())
            .field(
                "model_kind",
                &self.inner.model_info.as_ref().map(|i| i.kind.as_str()),
            )
            .finish()
    }
}
