//! Training procedure for shipeta delivery-time estimation.
//!
//! - [`SyntheticConfig`] / [`generate`] - Seeded synthetic training data
//! - [`read_csv`] / [`write_csv`] - CSV training sets
//! - [`train_test_split`] - Seeded holdout split
//! - [`TrainingPipeline`] - Load or synthesize, split, fit, evaluate

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/shipeta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod dataset;
mod error;
mod pipeline;
mod split;
mod synth;

pub use dataset::{CSV_HEADER, read_csv, read_csv_from, write_csv, write_csv_to};
pub use error::TrainError;
pub use pipeline::{DataSource, PipelineConfig, TrainingPipeline, TrainingReport};
pub use split::train_test_split;
pub use synth::{SyntheticConfig, delivery_days, generate};
