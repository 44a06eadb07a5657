//! Data structures shared by both prediction paths.

pub mod api;
pub mod record;

pub use api::{PredictRequest, PredictResponse};
pub use record::FoodRecord;
