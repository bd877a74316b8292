//! F1 lap time prediction HTTP microservice.
//!
//! This service exposes the `laptime-lib` prediction pipeline over HTTP.
//!
//! # Endpoints
//!
//! - `POST /api/v1/predict` - Predict a lap time (also served at `POST /predict`)
//! - `GET /api/v1/model` - Metadata of the loaded model
//! - `GET /` - Service banner
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe
//!
//! # Configuration
//!
//! - `LAPTIME_MODEL_PATH` - Path to the model artifact (default: models/lap_time_model.json)
//! - `LAPTIME_REQUIRE_MODEL` - Exit instead of serving without a model (default: false)
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `CORS_ALLOWED_ORIGINS` - Comma-separated origins (default: any)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED` / `METRICS_PATH` - Prometheus endpoint settings

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use laptime_lib::{Error as LibError, PredictionResult};
use laptime_service_shared::{
    AppState, CorsConfig, MetricsConfig, PredictRequest, ProblemDetails, RequestId,
    RequestTrackingLayer, Validate, cors_layer, from_lib_error, health_live, health_ready,
    metrics_handler, record_predicted_lap_time, record_prediction_failed,
    record_prediction_served,
};

/// Canonical prediction route.
pub const PREDICT_PATH: &str = "/api/v1/predict";

/// Legacy prediction route kept for existing clients.
pub const PREDICT_ALIAS_PATH: &str = "/predict";

/// Banner returned by `GET /`.
pub const HOME_MESSAGE: &str = "F1 Lap Time Prediction API is running!";

/// Body of `GET /`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HomeResponse {
    pub message: String,
}

/// HTTP response - either success or RFC 9457 error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Response {
    Success(PredictionResult),
    Error(ProblemDetails),
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        match self {
            Response::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            Response::Error(problem) => problem.into_response(),
        }
    }
}

/// Build the service router around a prepared state.
///
/// The metrics route is mounted only when metrics are enabled.
pub fn build_router(state: AppState, cors: &CorsConfig, metrics: &MetricsConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(home))
        .route(PREDICT_PATH, post(predict_handler))
        .route(PREDICT_ALIAS_PATH, post(predict_handler))
        .route("/api/v1/model", get(model_info_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready));

    if metrics.enabled {
        router = router.route(&metrics.path, get(metrics_handler));
    }

    router
        .layer(cors_layer(cors))
        .layer(RequestTrackingLayer)
        .with_state(state)
}

/// Handle `GET /`.
async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: HOME_MESSAGE.to_string(),
    })
}

/// Handle `GET /api/v1/model`.
async fn model_info_handler(
    State(state): State<AppState>,
    request_id: RequestId,
) -> axum::response::Response {
    match state.model_info() {
        Some(info) => (StatusCode::OK, Json(info.clone())).into_response(),
        None => ProblemDetails::model_unavailable(request_id.as_str()).into_response(),
    }
}

/// Handle `POST /api/v1/predict` and its legacy alias.
///
/// An unavailable model refuses the request before the body is inspected.
async fn predict_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = request_id.as_str();

    if !state.is_ready() {
        warn!(
            request_id = %request_id,
            reason = state.unavailable_reason().unwrap_or("unknown"),
            "prediction refused, model unavailable"
        );
        return refuse(ProblemDetails::model_unavailable(request_id));
    }

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!(
                request_id = %request_id,
                error = %rejection.body_text(),
                "malformed request body"
            );
            return refuse(ProblemDetails::validation(
                None,
                rejection_message(&rejection),
                request_id,
            ));
        }
    };

    let record = match PredictRequest::from_json(&body, request_id)
        .and_then(|request| request.validate(request_id))
    {
        Ok(record) => record,
        Err(problem) => {
            warn!(request_id = %request_id, field = ?problem.field, "invalid request field");
            return refuse(*problem);
        }
    };

    info!(
        request_id = %request_id,
        lap_number = record.lap_number,
        compound = %record.compound,
        "handling prediction request"
    );

    match state.prediction_service().predict(&record) {
        Ok(result) => {
            record_prediction_served(&record.compound);
            record_predicted_lap_time(result.predicted_lap_time_seconds);
            info!(
                request_id = %request_id,
                predicted_lap_time_seconds = result.predicted_lap_time_seconds,
                "prediction served"
            );
            Response::Success(result)
        }
        Err(e) => {
            log_prediction_error(&e, request_id);
            refuse(from_lib_error(&e, request_id))
        }
    }
}

/// Caller-facing text for a body the JSON extractor refused; the parser's own
/// message is only logged.
fn rejection_message(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "request body must be sent as application/json"
        }
        JsonRejection::JsonSyntaxError(_) => "request body is not valid JSON",
        _ => "request body could not be read as JSON",
    }
}

fn refuse(problem: ProblemDetails) -> Response {
    record_prediction_failed(&problem.kind);
    Response::Error(problem)
}

fn log_prediction_error(error: &LibError, request_id: &str) {
    if error.is_client_error() {
        warn!(request_id = %request_id, kind = error.kind(), error = %error, "prediction rejected");
    } else {
        error!(request_id = %request_id, kind = error.kind(), error = %error, "prediction failed");
    }
}
