//! Error types for feature encoding and training data.

use thiserror::Error;

/// A feature value outside the domain the model was trained on.
///
/// The core prediction path never raises this; it is produced by
/// [`FeatureVector::validate`](crate::FeatureVector::validate) for callers
/// that opt into strict input checking.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    /// Distance is NaN or infinite.
    #[error("distance_km must be a finite number, got {0}")]
    NonFiniteDistance(f64),

    /// Distance is zero or negative.
    #[error("distance_km must be positive, got {0}")]
    NonPositiveDistance(f64),

    /// Transport mode code is not one of 0 (sea), 1 (road), 2 (air).
    #[error("Unknown transport mode: {0} (expected 0=sea, 1=road, 2=air)")]
    UnknownTransportMode(String),

    /// Container code is not one of 20 or 40.
    #[error("Unknown container type: {0} (expected 20 or 40)")]
    UnknownContainerType(String),
}

/// A training example that cannot be used for fitting.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Malformed training example at {location}: {reason}")]
pub struct ExampleError {
    /// Where the example came from (row index or file line).
    pub location: String,
    /// What is wrong with it.
    pub reason: String,
}

impl ExampleError {
    /// Creates a new malformed-example error.
    #[must_use]
    pub fn new(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Creates an error for the example at a zero-based index in a set.
    #[must_use]
    pub fn at_index(index: usize, reason: impl Into<String>) -> Self {
        Self::new(format!("example {index}"), reason)
    }

    /// Creates an error for a one-based line in a data file.
    #[must_use]
    pub fn at_line(line: usize, reason: impl Into<String>) -> Self {
        Self::new(format!("line {line}"), reason)
    }
}
