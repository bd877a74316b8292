//! Shared infrastructure for the lap time prediction HTTP service.
//!
//! This crate provides the HTTP glue around `laptime-lib`:
//!
//! - [`AppState`]: The prediction service and metadata of the loaded model
//! - [`health`]: Health check handlers for Kubernetes liveness/readiness probes
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request IDs, request spans and HTTP metrics
//! - [`ServiceConfig`] and [`cors_layer`]: Environment configuration
//! - [`PredictRequest`]: The prediction request body and its shape checks
//!
//! # Architecture
//!
//! Handlers stay thin; all prediction logic lives in `laptime-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse request JSON                                       │
//! │  - Check required fields                                    │
//! │  - Call PredictionService::predict                          │
//! │  - Map errors to ProblemDetails                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides a stub model and ready-made states for
//! handler testing. Enable the `test-utils` feature to access it from
//! dependent crates.

#![deny(warnings)]

pub mod config;
pub mod cors;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::ServiceConfig;
pub use cors::{cors_layer, AllowedOrigins, CorsConfig};
pub use health::{health_live, health_ready, HealthStatus, ModelSummary, ProbeState};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_predicted_lap_time, record_prediction_failed,
    record_prediction_served, MetricsConfig, MetricsError,
};
pub use middleware::{
    extract_or_generate_request_id, RequestId, RequestTrackingLayer, REQUEST_ID_HEADER,
};
pub use problem::{
    from_lib_error, ProblemDetails, KIND_MODEL_UNAVAILABLE, KIND_UNKNOWN_COMPOUND,
    KIND_VALIDATION_ERROR, PROBLEM_MODEL_UNAVAILABLE, PROBLEM_UNKNOWN_COMPOUND,
    PROBLEM_VALIDATION_ERROR,
};
pub use request::{PredictRequest, Validate};
pub use state::{AppState, AppStateError};
