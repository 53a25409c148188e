//! Training procedure errors.

use shipeta_model::ModelError;
use shipeta_types::ExampleError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during a training run.
///
/// All of them are fatal to the run; nothing is retried.
#[derive(Error, Debug)]
pub enum TrainError {
    /// A row of training data is unusable.
    #[error(transparent)]
    MalformedExample(#[from] ExampleError),

    /// Fitting failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Training data file could not be opened or created.
    #[error("Failed to access training data '{path}': {source}")]
    Io {
        /// The offending file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// CSV structure is invalid (bad header, unreadable record).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Pipeline settings are out of range.
    #[error("Invalid training configuration: {0}")]
    InvalidConfig(String),
}
