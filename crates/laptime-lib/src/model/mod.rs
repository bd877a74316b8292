//! Predictive models and model artifact loading.
//!
//! The prediction pipeline only sees the [`PredictiveModel`] trait. Concrete
//! models are built from a JSON artifact (see [`artifact`]) once at startup and
//! shared read-only behind an `Arc`.

pub mod artifact;
mod linear;
mod tree;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::features::FeatureVector;

pub use artifact::{Aggregation, ModelArtifact, ModelSpec, TreeNodeSpec, TreeSpec, FORMAT_VERSION};
pub use linear::LinearModel;
pub use tree::{RegressionTree, TreeEnsemble};

/// A regression function from a feature vector to a lap time in seconds.
///
/// Implementations must be immutable after construction so they can be
/// invoked concurrently without locking, and deterministic for a given input.
pub trait PredictiveModel: Send + Sync {
    /// Estimate the lap time for `features`.
    fn estimate(&self, features: &FeatureVector) -> Result<f64>;

    /// Short identifier of the model family, used in logs and metadata.
    fn kind(&self) -> &'static str {
        "custom"
    }
}

/// Descriptive metadata about a loaded model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub kind: String,
    pub feature_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Number of trees, for ensemble models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_count: Option<usize>,
    /// RFC 3339 timestamp of the load.
    pub loaded_at: String,
}

/// A model together with its metadata.
#[derive(Clone)]
pub struct LoadedModel {
    pub model: Arc<dyn PredictiveModel>,
    pub info: ModelInfo,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("kind", &self.info.kind)
            .field("source", &self.info.source)
            .finish()
    }
}

/// The model slot injected into the prediction service.
///
/// A service built with [`ModelHandle::Unavailable`] refuses every prediction
/// with [`Error::ModelUnavailable`]; there is no fallback model.
#[derive(Clone)]
pub enum ModelHandle {
    Loaded(Arc<dyn PredictiveModel>),
    Unavailable { reason: String },
}

impl ModelHandle {
    pub fn loaded(model: Arc<dyn PredictiveModel>) -> Self {
        ModelHandle::Loaded(model)
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        ModelHandle::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelHandle::Loaded(_))
    }

    /// Borrow the model, or fail with [`Error::ModelUnavailable`].
    pub fn get(&self) -> Result<&dyn PredictiveModel> {
        match self {
            ModelHandle::Loaded(model) => Ok(model.as_ref()),
            ModelHandle::Unavailable { reason } => Err(Error::model_unavailable(reason.clone())),
        }
    }
}

impl From<LoadedModel> for ModelHandle {
    fn from(loaded: LoadedModel) -> Self {
        ModelHandle::Loaded(loaded.model)
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelHandle::Loaded(model) => f.debug_tuple("Loaded").field(&model.kind()).finish(),
            ModelHandle::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Load a model artifact from a JSON file.
pub fn load_model(path: impl AsRef<Path>) -> Result<LoadedModel> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::ModelNotFound {
            path: path.to_path_buf(),
        });
    }

    tracing::info!(path = %path.display(), "loading model artifact");
    let text = fs::read_to_string(path)?;
    let mut loaded = load_model_from_str(&text)?;
    loaded.info.source = Some(path.to_path_buf());

    tracing::info!(
        kind = %loaded.info.kind,
        trees = ?loaded.info.tree_count,
        "model artifact loaded"
    );
    Ok(loaded)
}

/// Load a model artifact from an in-memory JSON document.
pub fn load_model_from_str(json: &str) -> Result<LoadedModel> {
    let artifact: ModelArtifact = serde_json::from_str(json)?;
    artifact.build()
}
