//! Core types for shipeta delivery-time estimation.
//!
//! This crate provides the data model shared by training and inference:
//!
//! - [`FeatureVector`] - Fixed-order encoding of one prediction request
//! - [`TransportMode`] - Sea, road or air freight
//! - [`ContainerType`] - Nominal container size (20ft or 40ft)
//! - [`TrainingExample`] - A feature vector paired with its delivery time
//! - [`TrainingSet`] - Labeled examples used to fit an estimator

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/shipeta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod container;
mod error;
mod example;
mod feature;
mod transport;

pub use container::ContainerType;
pub use error::{ExampleError, FeatureError};
pub use example::{TrainingExample, TrainingSet};
pub use feature::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
pub use transport::TransportMode;
