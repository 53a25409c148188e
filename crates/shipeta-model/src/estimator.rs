//! The estimator capability and the serializable fitted state.

use serde::{Deserialize, Serialize};
use shipeta_types::{FeatureVector, TrainingSet};
use std::str::FromStr;

use crate::{ForestConfig, LinearRegression, ModelError, RandomForest};

/// A fitted regression model mapping a feature vector to delivery days.
///
/// Implementations are immutable once fitted, so a single instance can be
/// shared across threads for the lifetime of a serving process.
pub trait Estimator: Send + Sync + std::fmt::Debug {
    /// Scores one feature vector, returning unrounded delivery days.
    fn predict(&self, features: &FeatureVector) -> f64;

    /// Returns a short name for the model family.
    ///
    /// Built-in models return their [`ModelKind::as_str`].
    fn name(&self) -> &'static str {
        "custom"
    }

    /// Scores several feature vectors.
    fn predict_batch(&self, features: &[FeatureVector]) -> Vec<f64> {
        features.iter().map(|f| self.predict(f)).collect()
    }
}

/// Fitting procedure for an estimator type.
pub trait Fit: Sized {
    /// Hyperparameters.
    type Config;

    /// Fits a model to the training set.
    ///
    /// # Errors
    ///
    /// Returns an error if the set is empty, holds a malformed example, or
    /// the configuration is invalid.
    fn fit(config: &Self::Config, set: &TrainingSet) -> Result<Self, ModelError>;
}

/// Model family identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Bagged regression trees.
    #[default]
    Forest,
    /// Ordinary least squares.
    Linear,
}

impl ModelKind {
    /// Returns the kind as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Forest => "forest",
            Self::Linear => "linear",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forest" | "random-forest" | "rf" => Ok(Self::Forest),
            "linear" | "ols" => Ok(Self::Linear),
            _ => Err(ModelError::InvalidConfig(format!(
                "unknown model kind '{s}', expected one of: forest, linear"
            ))),
        }
    }
}

/// Which estimator to train, with its hyperparameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelConfig {
    /// Train a [`RandomForest`].
    Forest(ForestConfig),
    /// Train a [`LinearRegression`].
    Linear,
}

impl ModelConfig {
    /// Returns the model family this configuration trains.
    #[must_use]
    pub const fn kind(&self) -> ModelKind {
        match self {
            Self::Forest(_) => ModelKind::Forest,
            Self::Linear => ModelKind::Linear,
        }
    }

    /// Returns the random seed, if the model family uses one.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        match self {
            Self::Forest(config) => Some(config.seed),
            Self::Linear => None,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::Forest(ForestConfig::default())
    }
}

/// A fitted estimator of any supported family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EstimatorState {
    /// Fitted random forest.
    Forest(RandomForest),
    /// Fitted linear model.
    Linear(LinearRegression),
}

impl EstimatorState {
    /// Returns the model family.
    #[must_use]
    pub const fn kind(&self) -> ModelKind {
        match self {
            Self::Forest(_) => ModelKind::Forest,
            Self::Linear(_) => ModelKind::Linear,
        }
    }

    /// Checks the fitted state for structural consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidStructure`] if the model cannot be scored
    /// safely.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::Forest(forest) => forest.validate(),
            Self::Linear(linear) => linear.validate(),
        }
    }

    /// Returns normalized feature importances, if the model provides them.
    #[must_use]
    pub const fn feature_importances(&self) -> Option<&[f64]> {
        match self {
            Self::Forest(forest) => Some(forest.feature_importances()),
            Self::Linear(_) => None,
        }
    }
}

impl Estimator for EstimatorState {
    fn predict(&self, features: &FeatureVector) -> f64 {
        match self {
            Self::Forest(forest) => forest.predict(features),
            Self::Linear(linear) => linear.predict(features),
        }
    }

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Fits the estimator described by `config`.
///
/// Training has no side effects; persist the result with [`crate::save`].
///
/// # Errors
///
/// Returns an error if fitting fails.
pub fn train(config: &ModelConfig, set: &TrainingSet) -> Result<EstimatorState, ModelError> {
    tracing::info!(
        kind = %config.kind(),
        examples = set.len(),
        "training estimator"
    );

    let state = match config {
        ModelConfig::Forest(forest_config) => {
            EstimatorState::Forest(RandomForest::fit(forest_config, set)?)
        }
        ModelConfig::Linear => EstimatorState::Linear(LinearRegression::fit(&(), set)?),
    };

    tracing::debug!(kind = %state.kind(), "estimator fitted");
    Ok(state)
}
