//! Predict command handler.

use std::path::Path;

use anyhow::{Context, Result};

use laptime_lib::{load_model, LapRecord, ModelHandle, PredictionResult, PredictionService};

use crate::output::{render_prediction, OutputFormat};
use crate::remote::RemoteClient;

/// Where predictions are computed.
#[derive(Debug, Clone, Copy)]
pub enum PredictTarget<'a> {
    /// Load the artifact and predict in-process.
    Local(&'a Path),
    /// Ask a running service.
    Remote(&'a str),
}

/// Handle the predict subcommand.
pub fn handle_predict(
    target: PredictTarget<'_>,
    record: &LapRecord,
    format: OutputFormat,
) -> Result<()> {
    let result = predict(target, record)?;
    println!("{}", render_prediction(&result, format)?);
    Ok(())
}

/// Compute a prediction against `target`.
pub fn predict(target: PredictTarget<'_>, record: &LapRecord) -> Result<PredictionResult> {
    match target {
        PredictTarget::Local(path) => {
            let loaded = load_model(path)
                .with_context(|| format!("failed to load model from {}", path.display()))?;
            let service = PredictionService::new(ModelHandle::from(loaded));
            service
                .predict(record)
                .with_context(|| format!("prediction failed for lap {}", record.lap_number))
        }
        PredictTarget::Remote(url) => RemoteClient::new(url)?.predict(record),
    }
}
