//! Food Status Model Service - Main Entry Point
//!
//! Loads the ONNX model artifact and serves predictions over HTTP.
//! A missing or unreadable model file aborts startup.

use anyhow::{Context, Result};
use food_status_service::{
    config::AppConfig,
    metrics::{MetricsReporter, ServiceMetrics},
    models::predictor::FoodStatusModel,
    server::{build_router, AppState},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("food_status_service=info".parse()?),
        )
        .init();

    info!("Starting food status model service");

    // Load configuration
    let config = AppConfig::load()?;
    info!(
        model_path = %config.model.path,
        labels = ?config.model.labels,
        "Configuration loaded"
    );

    // Load the model; fatal if the artifact is missing
    let model = FoodStatusModel::from_config(&config)
        .context("model load failed, refusing to start")?;
    info!("Model loaded, service ready");

    // Metrics with periodic summary
    let metrics = Arc::new(ServiceMetrics::new());
    MetricsReporter::spawn(Arc::clone(&metrics), Duration::from_secs(60));

    let state = AppState::new(Arc::new(model), metrics);
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Listening for prediction requests");

    axum::serve(listener, app).await?;

    Ok(())
}
