//! Request handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use shipeta_types::FeatureVector;

use crate::{ApiError, AppState, ValidationPolicy};

/// Body of `POST /predict`.
///
/// The two codes accept JSON integers and integral floats such as `40.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Shipping distance in kilometers.
    pub distance_km: f64,
    /// Transport mode code (0 sea, 1 road, 2 air).
    #[serde(deserialize_with = "integral_code")]
    pub transport_mode: i64,
    /// Container size in feet (20 or 40).
    #[serde(deserialize_with = "integral_code")]
    pub container_type: i64,
}

/// Largest magnitude at which every integer is exactly representable as `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn integral_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Integer(i64),
        Float(f64),
    }

    match Code::deserialize(deserializer)? {
        Code::Integer(code) => Ok(code),
        Code::Float(code) if code.fract() == 0.0 && code.abs() <= MAX_EXACT_INTEGER => {
            Ok(code as i64)
        }
        Code::Float(code) => Err(de::Error::custom(format!(
            "expected an integral code, found {code}"
        ))),
    }
}

impl From<PredictRequest> for FeatureVector {
    fn from(request: PredictRequest) -> Self {
        Self::encode(
            request.distance_km,
            request.transport_mode,
            request.container_type,
        )
    }
}

/// Body of a successful `POST /predict`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Estimate rounded to two decimals.
    pub estimated_delivery_days: f64,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` once the server is up.
    pub status: String,
    /// Model family of the loaded artifact.
    pub model: String,
}

pub(crate) async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = body?;
    let features = FeatureVector::from(request);
    if state.validation == ValidationPolicy::Reject {
        features.validate()?;
    }

    let estimated_delivery_days = state.predictor.predict_features(&features);
    tracing::debug!(%features, estimated_delivery_days, "prediction");
    Ok(Json(PredictResponse {
        estimated_delivery_days,
    }))
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.predictor.model_name().to_string(),
    })
}
