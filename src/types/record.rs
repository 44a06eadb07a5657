//! The two-field feature record consumed by the standalone predictor.

use crate::error::PredictError;
use serde::{Deserialize, Serialize};

/// Storage descriptor value for refrigerated food.
pub const REFRIGERATED: &str = "Refrigerated";
/// Storage descriptor value for food kept at room temperature.
pub const ROOM_TEMPERATURE: &str = "Room Temperature";

/// A single-row record with the two fields the food status model was
/// trained on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodRecord {
    /// Hours elapsed since the food was prepared.
    pub hours_since_prepared: f64,
    /// Storage descriptor, one of [`REFRIGERATED`] or [`ROOM_TEMPERATURE`].
    pub storage_type: String,
}

impl FoodRecord {
    /// Build a record from loosely-typed inputs.
    ///
    /// The duration accepts anything coercible to hours (see [`IntoHours`]);
    /// a value like `"not-a-number"` yields [`PredictError::Schema`] instead
    /// of panicking.
    pub fn new(
        hours_since_prepared: impl IntoHours,
        storage_type: impl Into<String>,
    ) -> Result<Self, PredictError> {
        Ok(Self {
            hours_since_prepared: hours_since_prepared.into_hours()?,
            storage_type: storage_type.into(),
        })
    }

    /// Encode the record into the feature order the model expects:
    /// `[hours_since_prepared, storage_code]`.
    pub fn encode(&self) -> Result<Vec<f32>, PredictError> {
        Ok(vec![self.hours_since_prepared as f32, self.storage_code()?])
    }

    /// Categorical encoding used during training.
    fn storage_code(&self) -> Result<f32, PredictError> {
        match self.storage_type.as_str() {
            REFRIGERATED => Ok(0.0),
            ROOM_TEMPERATURE => Ok(1.0),
            other => Err(PredictError::Schema(format!(
                "unknown storage type {other:?}, expected {REFRIGERATED:?} or {ROOM_TEMPERATURE:?}"
            ))),
        }
    }
}

/// Coercion of loosely-typed duration inputs into hours.
///
/// Mirrors how callers hand the duration over: as a float, an integer,
/// or a numeric string.
pub trait IntoHours {
    fn into_hours(self) -> Result<f64, PredictError>;
}

impl IntoHours for f64 {
    fn into_hours(self) -> Result<f64, PredictError> {
        Ok(self)
    }
}

impl IntoHours for f32 {
    fn into_hours(self) -> Result<f64, PredictError> {
        Ok(self as f64)
    }
}

impl IntoHours for i64 {
    fn into_hours(self) -> Result<f64, PredictError> {
        Ok(self as f64)
    }
}

impl IntoHours for i32 {
    fn into_hours(self) -> Result<f64, PredictError> {
        Ok(self as f64)
    }
}

impl IntoHours for u32 {
    fn into_hours(self) -> Result<f64, PredictError> {
        Ok(self as f64)
    }
}

impl IntoHours for &str {
    fn into_hours(self) -> Result<f64, PredictError> {
        self.trim()
            .parse::<f64>()
            .map_err(|_| PredictError::Schema(format!("cannot interpret {self:?} as hours")))
    }
}

impl IntoHours for String {
    fn into_hours(self) -> Result<f64, PredictError> {
        self.as_str().into_hours()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(4.5_f64.into_hours().unwrap(), 4.5);
        assert_eq!(4_i32.into_hours().unwrap(), 4.0);
        assert_eq!("4.5".into_hours().unwrap(), 4.5);
        assert_eq!(" 12 ".into_hours().unwrap(), 12.0);
    }

    #[test]
    fn test_bad_hours_is_schema_error() {
        let err = "not-a-number".into_hours().unwrap_err();
        assert!(matches!(err, PredictError::Schema(_)));
        assert!(err.to_string().contains("not-a-number"));
    }

    #[test]
    fn test_encode_known_storage_types() {
        let cold = FoodRecord::new(4.5, REFRIGERATED).unwrap();
        assert_eq!(cold.encode().unwrap(), vec![4.5, 0.0]);

        let warm = FoodRecord::new(4.5, ROOM_TEMPERATURE).unwrap();
        assert_eq!(warm.encode().unwrap(), vec![4.5, 1.0]);
    }

    #[test]
    fn test_unknown_storage_type_is_schema_error() {
        let record = FoodRecord::new(2.0, "Freezer").unwrap();
        let err = record.encode().unwrap_err();
        assert!(matches!(err, PredictError::Schema(_)));
        assert!(err.to_string().contains("Freezer"));
    }
}
