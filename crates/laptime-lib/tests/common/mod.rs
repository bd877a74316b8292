//! Common test utilities and fixture helpers.
//!
//! Stub models here stand in for a trained artifact so pipeline tests can
//! assert exact outputs independent of model internals.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use laptime_lib::{
    Error, FeatureVector, LapRecord, ModelHandle, PredictionService, PredictiveModel, Result,
};

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// The reference lap used throughout the tests.
#[allow(dead_code)]
pub fn sample_record() -> LapRecord {
    LapRecord {
        lap_number: 5,
        tyre_life: 10.0,
        sector1_time: 31.4,
        sector2_time: 42.1,
        sector3_time: 25.8,
        compound: "Soft".to_string(),
    }
}

/// Model that returns a fixed estimate and remembers the vectors it saw.
#[allow(dead_code)]
pub struct FixedModel {
    pub value: f64,
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<FeatureVector>>,
}

#[allow(dead_code)]
impl FixedModel {
    pub fn new(value: f64) -> Arc<Self> {
        Arc::new(Self {
            value,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_seen(&self) -> Option<FeatureVector> {
        self.seen.lock().expect("lock").last().copied()
    }
}

impl PredictiveModel for FixedModel {
    fn estimate(&self, features: &FeatureVector) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().expect("lock").push(*features);
        Ok(self.value)
    }

    fn kind(&self) -> &'static str {
        "fixed"
    }
}

/// Model whose invocation always fails with a non-model error.
#[allow(dead_code)]
pub struct BrokenModel;

impl PredictiveModel for BrokenModel {
    fn estimate(&self, _features: &FeatureVector) -> Result<f64> {
        Err(Error::InvalidModelArtifact {
            message: "weights corrupted".to_string(),
        })
    }
}

/// Model that produces NaN.
#[allow(dead_code)]
pub struct NanModel;

impl PredictiveModel for NanModel {
    fn estimate(&self, _features: &FeatureVector) -> Result<f64> {
        Ok(f64::NAN)
    }
}

/// Build a service around any model.
#[allow(dead_code)]
pub fn service_with(model: Arc<dyn PredictiveModel>) -> PredictionService {
    PredictionService::new(ModelHandle::loaded(model))
}
