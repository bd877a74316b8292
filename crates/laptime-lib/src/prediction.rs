//! The prediction pipeline: validate, encode, estimate, round.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::features::{encode, FeatureVector};
use crate::model::{ModelHandle, PredictiveModel};
use crate::record::LapRecord;

/// Decimal places kept in a predicted lap time.
pub const RESULT_DECIMALS: i32 = 3;

/// A successful lap time prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Estimated lap time in seconds, rounded to [`RESULT_DECIMALS`] places.
    pub predicted_lap_time_seconds: f64,
}

/// Round `value` to three decimal places, half away from zero.
///
/// Magnitudes too large to scale carry no fractional digits and are returned
/// unchanged, so a finite input always yields a finite result.
pub fn round_to_millis(value: f64) -> f64 {
    let scale = 10f64.powi(RESULT_DECIMALS);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

/// Stateless lap time prediction over an injected model.
///
/// Cloning is cheap; the model is shared behind an `Arc` and never mutated,
/// so a single service can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct PredictionService {
    model: ModelHandle,
}

impl PredictionService {
    pub fn new(model: ModelHandle) -> Self {
        Self { model }
    }

    /// Whether a model is loaded and predictions can be served.
    pub fn is_ready(&self) -> bool {
        self.model.is_loaded()
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    /// Predict the lap time for `record`.
    ///
    /// While no model is loaded every call fails with
    /// [`Error::ModelUnavailable`], whatever the input.
    pub fn predict(&self, record: &LapRecord) -> Result<PredictionResult> {
        let model = self.model.get()?;

        record.validate()?;
        let features = encode(record)?;
        let estimate = invoke(model, &features)?;

        Ok(PredictionResult {
            predicted_lap_time_seconds: round_to_millis(estimate),
        })
    }
}

fn invoke(model: &dyn PredictiveModel, features: &FeatureVector) -> Result<f64> {
    let estimate = model.estimate(features).map_err(|e| match e {
        Error::ModelUnavailable { .. } => e,
        other => Error::model_unavailable(other.to_string()),
    })?;

    if !estimate.is_finite() {
        return Err(Error::model_unavailable(format!(
            "{} model returned a non-finite estimate",
            model.kind()
        )));
    }
    Ok(estimate)
}
