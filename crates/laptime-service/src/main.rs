//! F1 lap time prediction HTTP microservice binary.
//!
//! See the `laptime_service` library docs for endpoints and configuration.

use std::net::SocketAddr;

use tracing::{error, info, warn};

use laptime_service::build_router;
use laptime_service_shared::{
    AppState, LoggingConfig, MetricsConfig, MetricsError, ServiceConfig, init_logging,
    init_metrics,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (reads LOG_FORMAT from environment)
    let logging_config = LoggingConfig::from_env().with_service("laptime");
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("failed to initialize logging: {e}");
    }

    // Initialize metrics
    let metrics_config = MetricsConfig::from_env();
    match init_metrics(&metrics_config) {
        Ok(()) | Err(MetricsError::Disabled) => {}
        Err(e) => {
            // Log but don't fail - metrics are optional
            warn!(error = %e, "failed to initialize metrics, continuing without metrics");
        }
    }

    let config = ServiceConfig::from_env();

    info!(
        model_path = %config.model_path.display(),
        port = config.port,
        require_model = config.require_model,
        credentials = config.cors.allows_credentials(),
        "starting lap time service"
    );

    // Load the model once; serve degraded unless a model is required
    let state = match AppState::load(&config.model_path) {
        Ok(state) => {
            if let Some(info) = state.model_info() {
                info!(
                    kind = %info.kind,
                    trees = ?info.tree_count,
                    loaded_at = %info.loaded_at,
                    "model loaded"
                );
            }
            state
        }
        Err(e) if config.require_model => {
            error!(error = %e, path = %config.model_path.display(), "failed to load model");
            return Err(e.into());
        }
        Err(e) => {
            error!(
                error = %e,
                path = %config.model_path.display(),
                "failed to load model, serving without predictions"
            );
            AppState::unavailable(e.to_string())
        }
    };

    let app = build_router(state, &config.cors, &metrics_config);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
