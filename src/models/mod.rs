//! Model loading and inference.

pub mod loader;
pub mod predictor;

pub use loader::ModelLoader;
pub use predictor::{food_safety_model, FoodStatusModel, Predictor};
