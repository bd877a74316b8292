//! Encode command handler.

use anyhow::{Context, Result};

use laptime_lib::{encode, FeatureVector, LapRecord};

use crate::output::{render_features, OutputFormat};

/// Handle the encode subcommand.
pub fn handle_encode(record: &LapRecord, format: OutputFormat) -> Result<()> {
    let features = encode_record(record)?;
    println!("{}", render_features(&features, format)?);
    Ok(())
}

/// Validate `record` and encode it into the model's feature vector.
pub fn encode_record(record: &LapRecord) -> Result<FeatureVector> {
    record.validate().context("invalid lap")?;
    encode(record).context("failed to encode lap")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(compound: &str) -> LapRecord {
        LapRecord {
            lap_number: 5,
            tyre_life: 10.0,
            sector1_time: 31.4,
            sector2_time: 42.1,
            sector3_time: 25.8,
            compound: compound.to_string(),
        }
    }

    #[test]
    fn encodes_reference_lap() {
        let features = encode_record(&record("Medium")).unwrap();
        assert_eq!(features.as_slice(), &[5.0, 10.0, 31.4, 42.1, 25.8, 1.0]);
    }

    #[test]
    fn rejects_invalid_lap_before_encoding() {
        let mut lap = record("Soft");
        lap.sector1_time = 0.0;
        let err = encode_record(&lap).unwrap_err();
        assert!(format!("{:#}", err).contains("sector1Time"));
    }
}
