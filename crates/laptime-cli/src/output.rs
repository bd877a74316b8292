//! Output formatting for command results.
//!
//! Renderers return strings so callers decide where they go; commands print
//! them to stdout.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use laptime_lib::{FeatureVector, ModelInfo, PredictionResult};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Render a prediction.
pub fn render_prediction(result: &PredictionResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format!(
            "Predicted lap time: {:.3} s",
            result.predicted_lap_time_seconds
        )),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
    }
}

#[derive(Serialize)]
struct EncodedFeatures<'a> {
    feature_names: Vec<&'static str>,
    values: &'a FeatureVector,
}

/// Render an encoded feature vector.
pub fn render_features(features: &FeatureVector, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let lines: Vec<String> = features
                .named()
                .map(|(name, value)| format!("{:<12} {}", name, value))
                .collect();
            Ok(lines.join("\n"))
        }
        OutputFormat::Json => {
            let encoded = EncodedFeatures {
                feature_names: features.named().map(|(name, _)| name).collect(),
                values: features,
            };
            Ok(serde_json::to_string_pretty(&encoded)?)
        }
    }
}

/// Render model metadata.
pub fn render_model_info(info: &ModelInfo, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut out = format!("Model kind: {}\n", info.kind);
            if let Some(trees) = info.tree_count {
                out.push_str(&format!("Trees:      {}\n", trees));
            }
            if let Some(source) = &info.source {
                out.push_str(&format!("Source:     {}\n", source.display()));
            }
            out.push_str(&format!("Features:   {}\n", info.feature_names.join(", ")));
            out.push_str(&format!("Loaded at:  {}", info.loaded_at));
            Ok(out)
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(info)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_text_keeps_three_decimals() {
        let result = PredictionResult {
            predicted_lap_time_seconds: 90.0,
        };
        let text = render_prediction(&result, OutputFormat::Text).unwrap();
        assert_eq!(text, "Predicted lap time: 90.000 s");
    }

    #[test]
    fn prediction_json_uses_wire_field() {
        let result = PredictionResult {
            predicted_lap_time_seconds: 90.123,
        };
        let json = render_prediction(&result, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["predicted_lap_time_seconds"], 90.123);
    }

    #[test]
    fn features_text_lists_names_in_order() {
        let features = FeatureVector::new([5.0, 10.0, 31.4, 42.1, 25.8, 0.0]);
        let text = render_features(&features, OutputFormat::Text).unwrap();
        let names: Vec<&str> = text
            .lines()
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        assert_eq!(
            names,
            [
                "LapNumber",
                "TyreLife",
                "Sector1Time",
                "Sector2Time",
                "Sector3Time",
                "Compound"
            ]
        );
    }

    #[test]
    fn features_json_pairs_names_and_values() {
        let features = FeatureVector::new([5.0, 10.0, 31.4, 42.1, 25.8, 2.0]);
        let json = render_features(&features, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["feature_names"][5], "Compound");
        assert_eq!(value["values"][5], 2.0);
    }
}
