//! Lap time prediction library entry points.
//!
//! This crate owns the prediction pipeline: lap record validation, feature
//! encoding, model artifact loading and the [`PredictionService`] that ties
//! them together. The HTTP service and the CLI depend only on what is
//! exported here.
//!

#![deny(warnings)]

pub mod error;
pub mod features;
pub mod model;
pub mod prediction;
pub mod record;

pub use error::{Error, Result};
pub use features::{encode, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use model::{
    load_model, load_model_from_str, LinearModel, LoadedModel, ModelHandle, ModelInfo,
    PredictiveModel, TreeEnsemble,
};
pub use prediction::{round_to_millis, PredictionResult, PredictionService};
pub use record::{Compound, LapRecord};
