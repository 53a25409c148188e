//! Predict command implementation.

use anyhow::{Context, Result};
use shipeta_lib::{PredictResponse, Predictor};
use std::path::PathBuf;

use crate::display::model_path;

/// Estimate delivery days for a single shipment.
pub(crate) fn predict(
    model: Option<PathBuf>,
    distance_km: f64,
    transport_mode: i64,
    container_type: i64,
    json: bool,
) -> Result<()> {
    let path = model_path(model);
    let predictor = Predictor::load(&path)
        .with_context(|| format!("Failed to load model from {}", path.display()))?;

    let estimated_delivery_days = predictor.predict(distance_km, transport_mode, container_type);

    if json {
        let response = PredictResponse {
            estimated_delivery_days,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("Estimated delivery: {estimated_delivery_days:.2} days");
    }

    Ok(())
}
