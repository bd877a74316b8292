//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Every error leaving the service is a problem document carrying a
//! machine-readable `kind` and a human-readable `message`, so callers branch on
//! the kind instead of parsing text.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use laptime_lib::Error as LibError;

/// Problem type URI for invalid or missing lap fields.
pub const PROBLEM_VALIDATION_ERROR: &str = "/problems/validation-error";

/// Problem type URI for unrecognized tyre compounds.
pub const PROBLEM_UNKNOWN_COMPOUND: &str = "/problems/unknown-compound";

/// Problem type URI for a missing or failing prediction model.
pub const PROBLEM_MODEL_UNAVAILABLE: &str = "/problems/model-unavailable";

/// Machine-readable problem kinds.
pub const KIND_VALIDATION_ERROR: &str = "validation_error";
pub const KIND_UNKNOWN_COMPOUND: &str = "unknown_compound";
pub const KIND_MODEL_UNAVAILABLE: &str = "model_unavailable";

const MODEL_UNAVAILABLE_MESSAGE: &str = "The lap time model is not available; try again later";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use laptime_service_shared::ProblemDetails;
///
/// let problem = ProblemDetails::validation(
///     Some("lapNumber"),
///     "invalid 'lapNumber': must be a positive integer",
///     "req-12345",
/// );
/// assert_eq!(problem.status, 400);
/// assert_eq!(problem.kind, "validation_error");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Machine-readable error kind.
    pub kind: String,

    /// Human-readable explanation specific to this occurrence.
    pub message: String,

    /// Offending request field, for validation problems.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Accepted values, for unknown compound problems.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<Vec<String>>,

    /// Request identifier of the failing occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    /// Create a new ProblemDetails with required fields.
    pub fn new(
        type_uri: impl Into<String>,
        title: impl Into<String>,
        status: StatusCode,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            kind: kind.into(),
            message: message.into(),
            field: None,
            accepted: None,
            instance: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_accepted(mut self, accepted: Vec<String>) -> Self {
        self.accepted = Some(accepted);
        self
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// Create a 400 problem for a bad or missing field.
    pub fn validation(
        field: Option<&str>,
        message: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        let problem = Self::new(
            PROBLEM_VALIDATION_ERROR,
            "Validation Error",
            StatusCode::BAD_REQUEST,
            KIND_VALIDATION_ERROR,
            message,
        )
        .with_request_id(request_id);

        match field {
            Some(field) => problem.with_field(field),
            None => problem,
        }
    }

    /// Create a 400 problem for an unrecognized compound label.
    pub fn unknown_compound(
        label: &str,
        accepted: Vec<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self::new(
            PROBLEM_UNKNOWN_COMPOUND,
            "Unknown Compound",
            StatusCode::BAD_REQUEST,
            KIND_UNKNOWN_COMPOUND,
            format!(
                "Compound '{}' is not recognized. Accepted: {}",
                label,
                accepted.join(", ")
            ),
        )
        .with_field("compound")
        .with_accepted(accepted)
        .with_request_id(request_id)
    }

    /// Create a 503 problem for a missing or failing model.
    ///
    /// The message is fixed; the underlying cause is only logged.
    pub fn model_unavailable(request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_MODEL_UNAVAILABLE,
            "Model Unavailable",
            StatusCode::SERVICE_UNAVAILABLE,
            KIND_MODEL_UNAVAILABLE,
            MODEL_UNAVAILABLE_MESSAGE,
        )
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.title, self.kind, self.message)
    }
}

impl std::error::Error for ProblemDetails {}

/// Implement IntoResponse for axum to return ProblemDetails as HTTP responses.
impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// The `request_id` must be provided separately since library errors don't have it.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::Validation { field, .. } => {
            ProblemDetails::validation(Some(*field), error.to_string(), request_id)
        }
        LibError::UnknownCompound { label, accepted } => {
            ProblemDetails::unknown_compound(label, accepted.clone(), request_id)
        }
        _ => ProblemDetails::model_unavailable(request_id),
    }
}
