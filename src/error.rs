//! Closed error taxonomy for model loading and prediction.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Everything that can go wrong between accepting an input and
/// returning a prediction.
///
/// Callers can tell malformed input (`Schema`) apart from a failure
/// inside the model itself (`Model`); `Load` only occurs while
/// constructing a [`crate::models::predictor::FoodStatusModel`].
#[derive(Debug, Error)]
pub enum PredictError {
    /// The model artifact could not be found or deserialized.
    #[error("model load failed: {0}")]
    Load(String),

    /// The caller's input could not be coerced into a feature record.
    #[error("invalid input: {0}")]
    Schema(String),

    /// ONNX Runtime rejected the input or failed internally.
    #[error("model inference failed: {0}")]
    Model(String),
}

impl PredictError {
    /// HTTP status for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            PredictError::Load(_) => StatusCode::SERVICE_UNAVAILABLE,
            PredictError::Schema(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PredictError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Structured error payload returned by the standalone predictor.
    pub fn to_value(&self) -> serde_json::Value {
        json!({ "error": self.to_string() })
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            PredictError::Load("gone".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            PredictError::Schema("bad hours".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            PredictError::Model("shape mismatch".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_value_shape() {
        let value = PredictError::Schema("cannot interpret \"x\" as hours".into()).to_value();
        let message = value.get("error").and_then(|v| v.as_str()).unwrap();
        assert!(message.contains("cannot interpret"));
    }

    #[tokio::test]
    async fn test_detail_is_non_empty() {
        let response = PredictError::Model("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let detail = body["detail"].as_str().unwrap();
        assert!(!detail.is_empty());
        assert!(detail.contains("boom"));
    }
}
