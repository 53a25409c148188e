//! Delivery-time estimators for shipeta.
//!
//! This crate turns a [`TrainingSet`](shipeta_types::TrainingSet) into a fitted
//! model, persists it, and exposes the single prediction entry point used by
//! the serving layer:
//!
//! - [`Estimator`] - Capability shared by every fitted model
//! - [`RandomForest`] - Bagged CART regression trees (the production model)
//! - [`LinearRegression`] - Ordinary least squares, a cheap deterministic model
//! - [`EstimatorState`] - Serializable union of the fitted models
//! - [`Artifact`] - On-disk representation of a fitted model plus metadata
//! - [`Predictor`] - Shared read-only handle that encodes, scores and rounds
//! - [`Evaluation`] - Holdout accuracy metrics

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/shipeta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod artifact;
mod error;
mod estimator;
mod forest;
mod linear;
mod metrics;
mod predictor;
mod tree;

pub use artifact::{
    ARTIFACT_MAGIC, ARTIFACT_VERSION, Artifact, ArtifactError, ArtifactMetadata, DecodeError, load,
    save,
};
pub use error::ModelError;
pub use estimator::{Estimator, EstimatorState, Fit, ModelConfig, ModelKind, train};
pub use forest::{ForestConfig, MaxFeatures, RandomForest};
pub use linear::LinearRegression;
pub use metrics::Evaluation;
pub use predictor::{Predictor, round_days};
pub use tree::{Node, RegressionTree, TreeConfig};
