//! ONNX model loader

use crate::error::PredictError;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// Loaded ONNX model with the tensor names discovered from its metadata.
#[derive(Debug)]
pub struct LoadedModel {
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the model
    pub input_name: String,
    /// Output carrying the predicted class label, if the model exposes one
    pub label_output: Option<String>,
    /// Output carrying class probabilities, if the model exposes one
    pub prob_output: Option<String>,
}

/// Loader for the serialized model artifact.
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread).
    pub fn new() -> Result<Self, PredictError> {
        Self::with_threads(1)
    }

    /// Create a new model loader with the given intra-op thread count.
    pub fn with_threads(onnx_threads: usize) -> Result<Self, PredictError> {
        ort::init()
            .commit()
            .map_err(|e| PredictError::Load(format!("ONNX Runtime init failed: {e}")))?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Deserialize the model at `path` into an in-memory session.
    ///
    /// A missing file is fatal: there is no retry, fallback, or
    /// partial-load behavior.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadedModel, PredictError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PredictError::Load(format!(
                "model file not found at {}",
                path.display()
            )));
        }

        info!(path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.with_intra_threads(self.onnx_threads))
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| {
                PredictError::Load(format!("failed to load model from {}: {e}", path.display()))
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone());

        let prob_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob") || o.name.contains("output"))
            .map(|o| o.name.clone());

        info!(
            path = %path.display(),
            input = %input_name,
            label_output = ?label_output,
            prob_output = ?prob_output,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            session,
            input_name,
            label_output,
            prob_output,
        })
    }
}
