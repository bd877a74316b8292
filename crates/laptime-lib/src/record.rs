//! Lap records and tyre compounds.
//!
//! A [`LapRecord`] is the raw input of a prediction. It is deliberately loose
//! (signed integers, free-form compound label) so that out-of-range values
//! reach [`LapRecord::validate`] and produce a field-specific error instead of
//! a deserialization failure.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tyre compound fitted for the lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compound {
    Soft,
    Medium,
    Hard,
}

impl Compound {
    /// All recognized compounds, in code order.
    pub const ALL: [Compound; 3] = [Compound::Soft, Compound::Medium, Compound::Hard];

    /// Integer code the model was trained with.
    pub fn code(self) -> u8 {
        match self {
            Compound::Soft => 0,
            Compound::Medium => 1,
            Compound::Hard => 2,
        }
    }

    /// Wire label of the compound.
    pub fn label(self) -> &'static str {
        match self {
            Compound::Soft => "Soft",
            Compound::Medium => "Medium",
            Compound::Hard => "Hard",
        }
    }

    /// Labels of every recognized compound.
    pub fn accepted_labels() -> Vec<String> {
        Self::ALL.iter().map(|c| c.label().to_string()).collect()
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Compound {
    type Err = Error;

    /// Exact, case-sensitive match. Unrecognized labels are rejected rather
    /// than mapped to a default code.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| Error::UnknownCompound {
                label: s.to_string(),
                accepted: Self::accepted_labels(),
            })
    }
}

/// Telemetry of a single lap, as submitted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LapRecord {
    /// Lap index within the session (1-based).
    #[serde(alias = "LapNumber")]
    pub lap_number: i64,

    /// Laps completed on the current tyre set.
    #[serde(alias = "TyreLife")]
    pub tyre_life: f64,

    #[serde(alias = "Sector1Time")]
    pub sector1_time: f64,

    #[serde(alias = "Sector2Time")]
    pub sector2_time: f64,

    #[serde(alias = "Sector3Time")]
    pub sector3_time: f64,

    /// Compound label, e.g. "Soft".
    #[serde(alias = "Compound")]
    pub compound: String,
}

impl LapRecord {
    /// Check every numeric bound. The compound label is checked by the
    /// encoder, which owns the categorical mapping.
    pub fn validate(&self) -> Result<()> {
        if self.lap_number < 1 {
            return Err(Error::Validation {
                field: "lapNumber",
                constraint: "must be a positive integer",
            });
        }

        if !self.tyre_life.is_finite() || self.tyre_life < 0.0 {
            return Err(Error::Validation {
                field: "tyreLife",
                constraint: "must be a non-negative number",
            });
        }

        for (field, value) in [
            ("sector1Time", self.sector1_time),
            ("sector2Time", self.sector2_time),
            ("sector3Time", self.sector3_time),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Validation {
                    field,
                    constraint: "must be a positive number of seconds",
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LapRecord {
        LapRecord {
            lap_number: 5,
            tyre_life: 10.0,
            sector1_time: 31.4,
            sector2_time: 42.1,
            sector3_time: 25.8,
            compound: "Soft".to_string(),
        }
    }

    #[test]
    fn compound_codes_follow_training_order() {
        assert_eq!(Compound::Soft.code(), 0);
        assert_eq!(Compound::Medium.code(), 1);
        assert_eq!(Compound::Hard.code(), 2);
    }

    #[test]
    fn compound_parse_is_case_sensitive() {
        assert_eq!("Hard".parse::<Compound>().unwrap(), Compound::Hard);
        let err = "hard".parse::<Compound>().unwrap_err();
        assert!(matches!(err, Error::UnknownCompound { ref label, .. } if label == "hard"));
    }

    #[test]
    fn valid_record_passes() {
        assert!(record().validate().is_ok());
    }

    #[test]
    fn lap_number_boundaries() {
        let mut r = record();
        r.lap_number = 1;
        assert!(r.validate().is_ok());

        r.lap_number = 0;
        let err = r.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { field: "lapNumber", .. }));
    }

    #[test]
    fn tyre_life_boundaries() {
        let mut r = record();
        r.tyre_life = 0.0;
        assert!(r.validate().is_ok());

        r.tyre_life = -1.0;
        let err = r.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { field: "tyreLife", .. }));
    }

    #[test]
    fn sector_times_must_be_positive() {
        let mut r = record();
        r.sector2_time = 0.0;
        let err = r.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { field: "sector2Time", .. }));

        let mut r = record();
        r.sector3_time = f64::NAN;
        let err = r.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { field: "sector3Time", .. }));
    }

    #[test]
    fn deserializes_camel_case_and_legacy_names() {
        let camel = r#"{"lapNumber":5,"tyreLife":10,"sector1Time":31.4,"sector2Time":42.1,"sector3Time":25.8,"compound":"Soft"}"#;
        let legacy = r#"{"LapNumber":5,"TyreLife":10,"Sector1Time":31.4,"Sector2Time":42.1,"Sector3Time":25.8,"Compound":"Soft"}"#;

        let a: LapRecord = serde_json::from_str(camel).unwrap();
        let b: LapRecord = serde_json::from_str(legacy).unwrap();
        assert_eq!(a, record());
        assert_eq!(b, record());
    }
}
