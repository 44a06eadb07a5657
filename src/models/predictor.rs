//! Prediction over the loaded food status model.

use crate::config::AppConfig;
use crate::error::PredictError;
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::record::{FoodRecord, IntoHours};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Seam between the serving layers and the model runtime.
///
/// The HTTP layer and the standalone function both go through this
/// trait, so tests can substitute a stub for the ONNX session.
pub trait Predictor: Send + Sync {
    /// Run the model on one raw feature vector, returned as a
    /// one-row batch of predictions.
    fn predict_batch(&self, features: &[f32]) -> Result<Vec<f32>, PredictError>;

    /// Run the model on a two-field record and map the predicted
    /// class to its text label.
    fn predict_record(&self, record: &FoodRecord) -> Result<String, PredictError>;
}

/// Owned raw output of one inference run.
struct RawPrediction {
    labels: Option<Vec<i64>>,
    scores: Option<Vec<f32>>,
}

/// One extractable output tensor, detached from the session.
enum OutputTensor {
    Labels(Vec<i64>),
    Scores(Vec<f32>),
}

/// Pick the label and score tensors out of a run's outputs, preferring
/// the names discovered at load time and falling back to a name scan.
fn select_prediction(
    outputs: Vec<(String, OutputTensor)>,
    label_name: Option<&str>,
    prob_name: Option<&str>,
) -> RawPrediction {
    let mut labels = None;
    let mut scores = None;

    for (name, tensor) in &outputs {
        match tensor {
            OutputTensor::Labels(data)
                if labels.is_none() && Some(name.as_str()) == label_name =>
            {
                labels = Some(data.clone());
            }
            OutputTensor::Scores(data) if scores.is_none() && Some(name.as_str()) == prob_name => {
                scores = Some(data.clone());
            }
            _ => {}
        }
    }

    for (name, tensor) in outputs {
        match tensor {
            OutputTensor::Labels(data) => {
                if labels.is_none() && name.contains("label") {
                    labels = Some(data);
                }
            }
            OutputTensor::Scores(data) => {
                if scores.is_none() {
                    scores = Some(data);
                }
            }
        }
    }

    RawPrediction { labels, scores }
}

/// Collapse a raw prediction into one value per batch row.
///
/// Labels pass through the way the original service returned
/// `model.predict(...)` verbatim; a scores-only model collapses its
/// single row to the winning class index so the batch size stays 1.
fn batch_predictions(raw: RawPrediction) -> Result<Vec<f32>, PredictError> {
    match (raw.labels, raw.scores) {
        (Some(labels), _) if !labels.is_empty() => {
            Ok(labels.into_iter().map(|l| l as f32).collect())
        }
        (_, Some(scores)) if !scores.is_empty() => Ok(vec![argmax(&scores) as f32]),
        _ => Err(PredictError::Model(
            "model produced an empty prediction".to_string(),
        )),
    }
}

/// The food status classifier, immutable after construction.
///
/// `Session::run` takes `&mut self`, so the session sits behind a
/// `Mutex`; nothing else about the model mutates after load.
#[derive(Debug)]
pub struct FoodStatusModel {
    model: Mutex<LoadedModel>,
    labels: Vec<String>,
}

impl FoodStatusModel {
    /// Load the model artifact at `path`.
    ///
    /// Fails with [`PredictError::Load`] when the path does not
    /// resolve; there is no silent default.
    pub fn load<P: AsRef<Path>>(
        path: P,
        onnx_threads: usize,
        labels: Vec<String>,
    ) -> Result<Self, PredictError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PredictError::Load(format!(
                "model file not found at {}",
                path.display()
            )));
        }

        let loader = ModelLoader::with_threads(onnx_threads)?;
        let model = loader.load(path)?;

        Ok(Self {
            model: Mutex::new(model),
            labels,
        })
    }

    /// Load the model described by the application configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, PredictError> {
        Self::load(
            &config.model.path,
            config.model.onnx_threads,
            config.model.labels.clone(),
        )
    }

    /// Run one `[1, n]` batch through the session and pull out
    /// whatever outputs the model exposes.
    fn run(&self, features: &[f32]) -> Result<RawPrediction, PredictError> {
        use ort::value::Tensor;

        let mut guard = self
            .model
            .lock()
            .map_err(|e| PredictError::Model(format!("model lock poisoned: {e}")))?;
        let model = &mut *guard;

        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .map_err(|e| PredictError::Model(format!("failed to create input tensor: {e}")))?;

        let outputs = model
            .session
            .run(ort::inputs![&model.input_name => input_tensor])
            .map_err(|e| PredictError::Model(e.to_string()))?;

        let mut collected = Vec::new();
        for (name, output) in outputs.iter() {
            if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
                collected.push((name.to_string(), OutputTensor::Labels(data.to_vec())));
            } else if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
                collected.push((name.to_string(), OutputTensor::Scores(data.to_vec())));
            }
        }

        let raw = select_prediction(
            collected,
            model.label_output.as_deref(),
            model.prob_output.as_deref(),
        );

        if raw.labels.is_none() && raw.scores.is_none() {
            return Err(PredictError::Model(
                "model produced no extractable output".to_string(),
            ));
        }

        Ok(raw)
    }
}

impl Predictor for FoodStatusModel {
    fn predict_batch(&self, features: &[f32]) -> Result<Vec<f32>, PredictError> {
        let raw = self.run(features)?;
        let predictions = batch_predictions(raw)?;

        debug!(
            n_features = features.len(),
            n_predictions = predictions.len(),
            "Batch prediction complete"
        );

        Ok(predictions)
    }

    fn predict_record(&self, record: &FoodRecord) -> Result<String, PredictError> {
        let features = record.encode()?;
        let raw = self.run(&features)?;

        let class_index = match (&raw.labels, &raw.scores) {
            (Some(labels), _) if !labels.is_empty() => labels[0].max(0) as usize,
            (_, Some(scores)) if !scores.is_empty() => argmax(scores),
            _ => {
                return Err(PredictError::Model(
                    "model produced an empty prediction".to_string(),
                ))
            }
        };

        let label = self
            .labels
            .get(class_index)
            .cloned()
            .unwrap_or_else(|| class_index.to_string());

        debug!(
            hours = record.hours_since_prepared,
            storage = %record.storage_type,
            label = %label,
            "Record prediction complete"
        );

        Ok(label)
    }
}

/// Predict the food status for a prepared dish.
///
/// The standalone counterpart of `POST /predict`: builds a two-field
/// record from the arguments and returns the predicted label as text.
/// Input-coercion failures come back as [`PredictError::Schema`]
/// (rendered as `{"error": ...}` via [`PredictError::to_value`]) rather
/// than panicking.
pub fn food_safety_model(
    model: &dyn Predictor,
    hours_since_prepared: impl IntoHours,
    storage_type: impl Into<String>,
) -> Result<String, PredictError> {
    let record = FoodRecord::new(hours_since_prepared, storage_type)?;
    model.predict_record(&record)
}

fn argmax(scores: &[f32]) -> usize {
    let mut best = 0;
    for (i, &score) in scores.iter().enumerate() {
        if score > scores[best] {
            best = i;
        }
    }
    best
}
