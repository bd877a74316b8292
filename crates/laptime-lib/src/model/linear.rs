use crate::error::Result;
use crate::features::{FeatureVector, FEATURE_COUNT};

use super::PredictiveModel;

/// Ordinary linear regression: `intercept + Σ coefficient_i * x_i`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    intercept: f64,
    coefficients: [f64; FEATURE_COUNT],
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: [f64; FEATURE_COUNT]) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &[f64; FEATURE_COUNT] {
        &self.coefficients
    }
}

impl PredictiveModel for LinearModel {
    fn estimate(&self, features: &FeatureVector) -> Result<f64> {
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features.as_slice())
            .map(|(c, x)| c * x)
            .sum();
        Ok(self.intercept + dot)
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_sector_times() {
        let model = LinearModel::new(0.0, [0.0, 0.0, 1.0, 1.0, 1.0, 0.0]);
        let vector = FeatureVector::new([5.0, 10.0, 31.4, 42.1, 25.8, 0.0]);
        let estimate = model.estimate(&vector).unwrap();
        assert!((estimate - 99.3).abs() < 1e-9);
    }

    #[test]
    fn applies_intercept_and_compound_weight() {
        let model = LinearModel::new(1.0, [0.0, 0.0, 0.0, 0.0, 0.0, 0.5]);
        let hard = FeatureVector::new([1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        assert_eq!(model.estimate(&hard).unwrap(), 2.0);
    }
}
