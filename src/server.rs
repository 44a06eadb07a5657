//! HTTP front end for the food status model.
//!
//! One prediction route plus a health check. The model handle is
//! injected at router construction rather than held as ambient
//! process state, so there is no load-order coupling.

use crate::error::PredictError;
use crate::metrics::ServiceMetrics;
use crate::models::predictor::Predictor;
use crate::types::api::{PredictRequest, PredictResponse};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};
use uuid::Uuid;

/// Shared state accessible by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The loaded model, immutable after construction.
    pub predictor: Arc<dyn Predictor>,
    /// Request metrics.
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(predictor: Arc<dyn Predictor>, metrics: Arc<ServiceMetrics>) -> Self {
        Self { predictor, metrics }
    }
}

/// Build the service router with all routes.
pub fn build_router(state: AppState) -> Router {
    // Pin the uptime clock to construction, not the first health probe
    START_TIME.get_or_init(Instant::now);

    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `POST /predict` — run the model on one raw feature vector.
///
/// The vector is forwarded as a single-row batch; its length and
/// feature order are not validated here, so a shape mismatch surfaces
/// from the runtime as a 500 with the failure message under `detail`.
async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, PredictError> {
    let request_id = Uuid::new_v4();
    let start = Instant::now();

    match state.predictor.predict_batch(&req.features) {
        Ok(predictions) => {
            let latency = start.elapsed();
            state.metrics.record_success(latency);
            debug!(
                request_id = %request_id,
                n_features = req.features.len(),
                latency_us = latency.as_micros() as u64,
                "Prediction served"
            );
            Ok(Json(PredictResponse { predictions }))
        }
        Err(e) => {
            state.metrics.record_failure();
            error!(
                request_id = %request_id,
                n_features = req.features.len(),
                error = %e,
                "Prediction failed"
            );
            Err(e)
        }
    }
}

/// Uptime clock, pinned when the router is built.
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Returns basic health status, version, and uptime.
async fn health() -> Json<serde_json::Value> {
    let start = START_TIME.get_or_init(Instant::now);
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": start.elapsed().as_secs()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::FoodRecord;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    struct StubPredictor {
        fail: bool,
    }

    impl Predictor for StubPredictor {
        fn predict_batch(&self, _features: &[f32]) -> Result<Vec<f32>, PredictError> {
            if self.fail {
                Err(PredictError::Model(
                    "input shape does not match model".to_string(),
                ))
            } else {
                Ok(vec![1.0])
            }
        }

        fn predict_record(&self, _record: &FoodRecord) -> Result<String, PredictError> {
            Ok("Safe".to_string())
        }
    }

    fn test_state(fail: bool) -> AppState {
        AppState::new(
            Arc::new(StubPredictor { fail }),
            Arc::new(ServiceMetrics::new()),
        )
    }

    #[tokio::test]
    async fn test_predict_returns_one_row_batch() {
        let state = test_state(false);
        let req = PredictRequest {
            features: vec![4.5, 0.0],
        };

        let Json(body) = predict(State(state.clone()), Json(req)).await.unwrap();
        assert_eq!(body.predictions, vec![1.0]);
        assert_eq!(
            state
                .metrics
                .predictions_served
                .load(std::sync::atomic::Ordering::Relaxed),
            1
        );
    }

    #[tokio::test]
    async fn test_predict_failure_maps_to_500() {
        let state = test_state(true);
        let req = PredictRequest {
            features: vec![1.0, 2.0, 3.0],
        };

        let err = predict(State(state.clone()), Json(req)).await.unwrap_err();
        assert!(!err.to_string().is_empty());

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            state
                .metrics
                .predictions_failed
                .load(std::sync::atomic::Ordering::Relaxed),
            1
        );
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
        assert!(body["uptime_secs"].is_u64());
    }

    #[tokio::test]
    async fn test_uptime_clock_starts_with_router() {
        let _app = build_router(test_state(false));
        assert!(START_TIME.get().is_some());
    }
}
