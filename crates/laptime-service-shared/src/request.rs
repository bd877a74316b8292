//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use laptime_lib::LapRecord;

use crate::ProblemDetails;

/// Validation trait for request types.
///
/// Implementations check the request shape and convert it into the library
/// type the handler works with, returning a `ProblemDetails` for invalid input.
pub trait Validate {
    /// The validated value produced on success.
    type Output;

    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(self, request_id: &str) -> Result<Self::Output, Box<ProblemDetails>>;
}

/// Body of `POST /api/v1/predict`.
///
/// Every field is optional at the serde level so that a missing field is
/// reported as a field-specific validation problem rather than a generic
/// deserialization failure. Range checks happen in the prediction pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    #[serde(alias = "LapNumber", skip_serializing_if = "Option::is_none")]
    pub lap_number: Option<i64>,

    #[serde(alias = "TyreLife", skip_serializing_if = "Option::is_none")]
    pub tyre_life: Option<f64>,

    #[serde(alias = "Sector1Time", skip_serializing_if = "Option::is_none")]
    pub sector1_time: Option<f64>,

    #[serde(alias = "Sector2Time", skip_serializing_if = "Option::is_none")]
    pub sector2_time: Option<f64>,

    #[serde(alias = "Sector3Time", skip_serializing_if = "Option::is_none")]
    pub sector3_time: Option<f64>,

    #[serde(alias = "Compound", skip_serializing_if = "Option::is_none")]
    pub compound: Option<String>,
}

fn required<T>(value: Option<T>, field: &str, request_id: &str) -> Result<T, Box<ProblemDetails>> {
    value.ok_or_else(|| {
        Box::new(ProblemDetails::validation(
            Some(field),
            format!("The '{}' field is required", field),
            request_id,
        ))
    })
}

/// Integers above this magnitude are not exactly representable as `f64`.
const MAX_WHOLE_FLOAT: f64 = 9_007_199_254_740_992.0;

fn invalid(field: &str, expected: &str, request_id: &str) -> Box<ProblemDetails> {
    Box::new(ProblemDetails::validation(
        Some(field),
        format!("invalid '{}': must be {}", field, expected),
        request_id,
    ))
}

/// Look up a field by wire name or legacy alias; `null` counts as absent.
fn lookup<'a>(object: &'a Map<String, Value>, name: &str, alias: &str) -> Option<&'a Value> {
    object
        .get(name)
        .or_else(|| object.get(alias))
        .filter(|value| !value.is_null())
}

fn integer_field(
    object: &Map<String, Value>,
    name: &str,
    alias: &str,
    request_id: &str,
) -> Result<Option<i64>, Box<ProblemDetails>> {
    lookup(object, name, alias)
        .map(|value| {
            value
                .as_i64()
                .or_else(|| {
                    value
                        .as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < MAX_WHOLE_FLOAT)
                        .map(|f| f as i64)
                })
                .ok_or_else(|| invalid(name, "an integer", request_id))
        })
        .transpose()
}

fn number_field(
    object: &Map<String, Value>,
    name: &str,
    alias: &str,
    request_id: &str,
) -> Result<Option<f64>, Box<ProblemDetails>> {
    lookup(object, name, alias)
        .map(|value| value.as_f64().ok_or_else(|| invalid(name, "a number", request_id)))
        .transpose()
}

fn string_field(
    object: &Map<String, Value>,
    name: &str,
    alias: &str,
    request_id: &str,
) -> Result<Option<String>, Box<ProblemDetails>> {
    lookup(object, name, alias)
        .map(|value| {
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid(name, "a string", request_id))
        })
        .transpose()
}

impl PredictRequest {
    /// Read a request from a parsed JSON body, naming the offending field when
    /// a value has the wrong type.
    ///
    /// `lapNumber` also accepts whole-valued floats such as `5.0`.
    pub fn from_json(body: &Value, request_id: &str) -> Result<Self, Box<ProblemDetails>> {
        let Some(object) = body.as_object() else {
            return Err(Box::new(ProblemDetails::validation(
                None,
                "request body must be a JSON object",
                request_id,
            )));
        };

        Ok(Self {
            lap_number: integer_field(object, "lapNumber", "LapNumber", request_id)?,
            tyre_life: number_field(object, "tyreLife", "TyreLife", request_id)?,
            sector1_time: number_field(object, "sector1Time", "Sector1Time", request_id)?,
            sector2_time: number_field(object, "sector2Time", "Sector2Time", request_id)?,
            sector3_time: number_field(object, "sector3Time", "Sector3Time", request_id)?,
            compound: string_field(object, "compound", "Compound", request_id)?,
        })
    }
}

impl Validate for PredictRequest {
    type Output = LapRecord;

    fn validate(self, request_id: &str) -> Result<LapRecord, Box<ProblemDetails>> {
        Ok(LapRecord {
            lap_number: required(self.lap_number, "lapNumber", request_id)?,
            tyre_life: required(self.tyre_life, "tyreLife", request_id)?,
            sector1_time: required(self.sector1_time, "sector1Time", request_id)?,
            sector2_time: required(self.sector2_time, "sector2Time", request_id)?,
            sector3_time: required(self.sector3_time, "sector3Time", request_id)?,
            compound: required(self.compound, "compound", request_id)?,
        })
    }
}

impl From<LapRecord> for PredictRequest {
    fn from(record: LapRecord) -> Self {
        Self {
            lap_number: Some(record.lap_number),
            tyre_life: Some(record.tyre_life),
            sector1_time: Some(record.sector1_time),
            sector2_time: Some(record.sector2_time),
            sector3_time: Some(record.sector3_time),
            compound: Some(record.compound),
        }
    }
}
