//! Shipment delivery-time estimation.
//!
//! This is a facade crate that re-exports functionality from the shipeta
//! workspace crates for convenient access.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/shipeta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use shipeta_types::*;

// Re-export the model layer
pub use shipeta_model::{
    ARTIFACT_MAGIC, ARTIFACT_VERSION, Artifact, ArtifactError, ArtifactMetadata, DecodeError,
    Estimator, EstimatorState, Evaluation, Fit, ForestConfig, LinearRegression, MaxFeatures,
    ModelConfig, ModelError, ModelKind, Predictor, RandomForest, RegressionTree, TreeConfig,
    load, round_days, save, train,
};

// Re-export the training procedure
#[cfg(feature = "train")]
pub use shipeta_train::{
    CSV_HEADER, DataSource, PipelineConfig, SyntheticConfig, TrainError, TrainingPipeline,
    TrainingReport, delivery_days, generate, read_csv, read_csv_from, train_test_split, write_csv,
    write_csv_to,
};

// Re-export the serving boundary
#[cfg(feature = "serve")]
pub use shipeta_serve::{
    ApiError, AppState, DEFAULT_ADDR, HealthResponse, PredictRequest, PredictResponse,
    ServeConfig, ServeError, ValidationPolicy, router, serve, shutdown_signal,
};

/// Prelude module for convenient imports.
///
/// ```
/// use shipeta_lib::prelude::*;
/// ```
pub mod prelude {
    pub use shipeta_types::{
        ContainerType, FeatureVector, TrainingExample, TrainingSet, TransportMode,
    };

    pub use shipeta_model::{
        Artifact, Estimator, EstimatorState, Evaluation, ForestConfig, ModelConfig, ModelKind,
        Predictor, load, save,
    };

    #[cfg(feature = "train")]
    pub use shipeta_train::{DataSource, PipelineConfig, SyntheticConfig, TrainingPipeline};

    #[cfg(feature = "serve")]
    pub use shipeta_serve::{ServeConfig, ValidationPolicy};
}
