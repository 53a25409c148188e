//! Training error types.

use shipeta_types::ExampleError;
use thiserror::Error;

/// Errors that can occur while fitting an estimator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// No examples to fit.
    #[error("Training set is empty")]
    EmptyTrainingSet,

    /// A training example is unusable.
    #[error(transparent)]
    MalformedExample(#[from] ExampleError),

    /// Model hyperparameters are out of range.
    #[error("Invalid model configuration: {0}")]
    InvalidConfig(String),

    /// The least squares system has no finite solution.
    #[error("Least squares solve failed: design matrix is degenerate")]
    Degenerate,

    /// A fitted model's internal structure is inconsistent.
    #[error("Invalid model structure: {0}")]
    InvalidStructure(String),
}
