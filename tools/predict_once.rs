//! One-shot standalone predictor
//!
//! Loads the food status model and prints the predicted label for a
//! single record given on the command line:
//!
//! ```text
//! predict-once <hours_since_prepared> <storage_type>
//! predict-once 4.5 Refrigerated
//! ```
//!
//! Coercion failures print the structured `{"error": ...}` payload
//! instead of aborting; a missing model file is fatal.

use anyhow::{bail, Context, Result};
use food_status_service::{
    config::AppConfig,
    models::predictor::{food_safety_model, FoodStatusModel},
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (hours, storage) = match args.as_slice() {
        [hours, storage] => (hours.clone(), storage.clone()),
        _ => bail!("usage: predict-once <hours_since_prepared> <storage_type>"),
    };

    let config = AppConfig::load()?;
    let model =
        FoodStatusModel::from_config(&config).context("model load failed, cannot predict")?;

    match food_safety_model(&model, hours, storage) {
        Ok(label) => println!("{label}"),
        Err(e) => println!("{}", e.to_value()),
    }

    Ok(())
}
