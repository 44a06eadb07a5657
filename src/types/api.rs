//! Wire types for the prediction endpoint.

use serde::{Deserialize, Serialize};

/// Request body for `POST /predict`.
///
/// The vector's length and feature order are the caller's responsibility;
/// shape errors surface from the model at inference time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Ordered numeric feature vector, treated as one batch row.
    pub features: Vec<f32>,
}

/// Response body for a successful `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// One prediction per batch row (always one row today).
    pub predictions: Vec<f32>,
}
