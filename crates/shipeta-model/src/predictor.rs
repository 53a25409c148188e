//! The prediction entry point.

use shipeta_types::FeatureVector;
use std::path::Path;
use std::sync::Arc;

use crate::{Artifact, ArtifactError, ArtifactMetadata, Estimator};

/// Magnitude above which an `f64` cannot hold hundredths, so rounding is a no-op.
const ROUNDING_LIMIT: f64 = 1e15;

/// Rounds a delivery-time estimate to two decimal places.
///
/// Values too large to carry hundredths, and non-finite values, are returned
/// unchanged.
#[must_use]
pub fn round_days(days: f64) -> f64 {
    if !days.is_finite() || days.abs() > ROUNDING_LIMIT {
        return days;
    }
    (days * 100.0).round() / 100.0
}

/// Shared, read-only handle to a fitted estimator.
///
/// Built once at startup and cloned into every request handler; clones share
/// the same estimator.
#[derive(Debug, Clone)]
pub struct Predictor {
    estimator: Arc<dyn Estimator>,
    metadata: Option<Arc<ArtifactMetadata>>,
}

impl Predictor {
    /// Wraps an in-memory estimator.
    #[must_use]
    pub fn new(estimator: impl Estimator + 'static) -> Self {
        Self {
            estimator: Arc::new(estimator),
            metadata: None,
        }
    }

    /// Wraps a loaded artifact, keeping its metadata.
    #[must_use]
    pub fn from_artifact(artifact: Artifact) -> Self {
        Self {
            estimator: Arc::new(artifact.state),
            metadata: Some(Arc::new(artifact.metadata)),
        }
    }

    /// Loads the artifact at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact is missing or corrupt.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        crate::load(path).map(Self::from_artifact)
    }

    /// Estimates delivery days for raw request fields, rounded to two decimals.
    ///
    /// Out-of-domain values are not rejected; the model extrapolates.
    #[must_use]
    pub fn predict(&self, distance_km: f64, transport_mode: i64, container_type: i64) -> f64 {
        self.predict_features(&FeatureVector::encode(
            distance_km,
            transport_mode,
            container_type,
        ))
    }

    /// Estimates delivery days for an encoded feature vector, rounded to two decimals.
    #[must_use]
    pub fn predict_features(&self, features: &FeatureVector) -> f64 {
        round_days(self.predict_raw(features))
    }

    /// Estimates delivery days without rounding.
    #[must_use]
    pub fn predict_raw(&self, features: &FeatureVector) -> f64 {
        self.estimator.predict(features)
    }

    /// Returns the model family name.
    #[must_use]
    pub fn model_name(&self) -> &'static str {
        self.estimator.name()
    }

    /// Returns the artifact metadata, if the predictor was loaded from one.
    #[must_use]
    pub fn metadata(&self) -> Option<&ArtifactMetadata> {
        self.metadata.as_deref()
    }
}
