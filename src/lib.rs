//! Food Status Model Service
//!
//! Exposes a pre-trained food status classifier two ways: an HTTP
//! service with a single `POST /predict` route over a raw feature
//! vector, and the standalone [`food_safety_model`] function over a
//! two-field record. Both share one ONNX model artifact, loaded once
//! and immutable thereafter.

pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::PredictError;
pub use metrics::ServiceMetrics;
pub use models::{food_safety_model, FoodStatusModel, Predictor};
pub use server::{build_router, AppState};
pub use types::{FoodRecord, PredictRequest, PredictResponse};
