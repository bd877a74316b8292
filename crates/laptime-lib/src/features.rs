//! Feature encoding for the lap time model.
//!
//! The position of each value in a [`FeatureVector`] must match the column
//! order the model was trained with. Reordering silently changes predictions,
//! so the canonical order is published as [`FEATURE_NAMES`] and checked
//! against every model artifact at load time.

use serde::Serialize;

use crate::error::Result;
use crate::record::{Compound, LapRecord};

/// Number of features the model consumes.
pub const FEATURE_COUNT: usize = 6;

/// Canonical feature order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "LapNumber",
    "TyreLife",
    "Sector1Time",
    "Sector2Time",
    "Sector3Time",
    "Compound",
];

/// Fixed-order numeric model input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Value at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Pairs of (feature name, value) in canonical order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl From<FeatureVector> for [f64; FEATURE_COUNT] {
    fn from(vector: FeatureVector) -> Self {
        vector.0
    }
}

/// Encode a lap record into the model's feature vector.
///
/// The compound label is mapped through [`Compound`]; unrecognized labels
/// fail with [`crate::Error::UnknownCompound`]. Numeric bounds are not
/// rechecked here, see [`LapRecord::validate`].
pub fn encode(record: &LapRecord) -> Result<FeatureVector> {
    let compound: Compound = record.compound.parse()?;

    Ok(FeatureVector([
        record.lap_number as f64,
        record.tyre_life,
        record.sector1_time,
        record.sector2_time,
        record.sector3_time,
        f64::from(compound.code()),
    ]))
}
