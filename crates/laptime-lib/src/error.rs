use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the lap time library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A lap record field is missing or outside its allowed range.
    #[error("invalid '{field}': {constraint}")]
    Validation {
        field: &'static str,
        constraint: &'static str,
    },

    /// The tyre compound label is not one of the recognized compounds.
    #[error("unknown compound '{label}'; expected one of: {}", accepted.join(", "))]
    UnknownCompound {
        label: String,
        accepted: Vec<String>,
    },

    /// No model is loaded, or the loaded model failed to produce an estimate.
    #[error("prediction model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    /// Model artifact could not be located at the given path.
    #[error("model artifact not found at {path}")]
    ModelNotFound { path: PathBuf },

    /// Model artifact parsed but violates a structural rule.
    #[error("invalid model artifact: {message}")]
    InvalidModelArtifact { message: String },

    /// Model artifact declares a feature order different from the encoder's.
    #[error("model feature order mismatch: expected [{}], found [{}]", expected.join(", "), found.join(", "))]
    FeatureOrderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Machine-readable error kind used at the request boundary.
    ///
    /// Load-time failures report as `model_unavailable` since they leave the
    /// service without a usable model.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation { .. } => "validation_error",
            Error::UnknownCompound { .. } => "unknown_compound",
            _ => "model_unavailable",
        }
    }

    /// Returns true for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation { .. } | Error::UnknownCompound { .. })
    }

    pub(crate) fn model_unavailable(reason: impl Into<String>) -> Self {
        Error::ModelUnavailable {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_artifact(message: impl Into<String>) -> Self {
        Error::InvalidModelArtifact {
            message: message.into(),
        }
    }
}
