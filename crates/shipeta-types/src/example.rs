//! Labeled training data.

use serde::{Deserialize, Serialize};

use crate::{ExampleError, FEATURE_COUNT, FeatureVector};

/// A feature vector paired with its observed delivery time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Model inputs.
    pub features: FeatureVector,
    /// Observed delivery time in days.
    pub delivery_days: f64,
}

impl TrainingExample {
    /// Creates a new training example.
    #[must_use]
    pub const fn new(features: FeatureVector, delivery_days: f64) -> Self {
        Self {
            features,
            delivery_days,
        }
    }

    /// Checks that the example can be fitted.
    ///
    /// # Errors
    ///
    /// Returns an error if a feature or the label is not finite. Negative labels
    /// are accepted.
    pub fn check(&self, index: usize) -> Result<(), ExampleError> {
        if !self.features.is_finite() {
            return Err(ExampleError::at_index(
                index,
                format!("non-finite distance_km {}", self.features.distance_km),
            ));
        }
        if !self.delivery_days.is_finite() {
            return Err(ExampleError::at_index(
                index,
                format!("non-finite delivery_days {}", self.delivery_days),
            ));
        }
        Ok(())
    }
}

/// An ordered collection of training examples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingSet {
    examples: Vec<TrainingExample>,
}

impl TrainingSet {
    /// Creates a training set from examples.
    #[must_use]
    pub const fn new(examples: Vec<TrainingExample>) -> Self {
        Self { examples }
    }

    /// Appends an example.
    pub fn push(&mut self, example: TrainingExample) {
        self.examples.push(example);
    }

    /// Returns the examples as a slice.
    #[must_use]
    pub fn examples(&self) -> &[TrainingExample] {
        &self.examples
    }

    /// Returns an iterator over the examples.
    pub fn iter(&self) -> std::slice::Iter<'_, TrainingExample> {
        self.examples.iter()
    }

    /// Returns the number of examples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Returns true if the set has no examples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Returns every feature vector as a numeric row.
    #[must_use]
    pub fn feature_rows(&self) -> Vec<[f64; FEATURE_COUNT]> {
        self.examples.iter().map(|e| e.features.to_array()).collect()
    }

    /// Returns every label.
    #[must_use]
    pub fn labels(&self) -> Vec<f64> {
        self.examples.iter().map(|e| e.delivery_days).collect()
    }

    /// Returns a new set holding the examples at the given indices.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        Self::new(indices.iter().map(|&i| self.examples[i]).collect())
    }

    /// Checks every example, stopping at the first malformed one.
    ///
    /// # Errors
    ///
    /// Returns the first malformed example.
    pub fn check(&self) -> Result<(), ExampleError> {
        self.examples
            .iter()
            .enumerate()
            .try_for_each(|(i, e)| e.check(i))
    }
}

impl FromIterator<TrainingExample> for TrainingSet {
    fn from_iter<I: IntoIterator<Item = TrainingExample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for TrainingSet {
    type Item = TrainingExample;
    type IntoIter = std::vec::IntoIter<TrainingExample>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.into_iter()
    }
}

impl<'a> IntoIterator for &'a TrainingSet {
    type Item = &'a TrainingExample;
    type IntoIter = std::slice::Iter<'a, TrainingExample>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> TrainingSet {
        vec![
            TrainingExample::new(FeatureVector::encode(1000.0, 0, 20), 14.0),
            TrainingExample::new(FeatureVector::encode(500.0, 2, 40), 3.0),
            TrainingExample::new(FeatureVector::encode(2500.0, 1, 40), 7.5),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_rows_and_labels() {
        let set = sample_set();
        assert_eq!(set.len(), 3);
        assert_eq!(set.feature_rows()[1], [500.0, 2.0, 40.0]);
        assert_eq!(set.labels(), vec![14.0, 3.0, 7.5]);
    }

    #[test]
    fn test_select() {
        let set = sample_set();
        let subset = set.select(&[2, 0]);
        assert_eq!(subset.labels(), vec![7.5, 14.0]);
    }

    #[test]
    fn test_check_rejects_bad_label() {
        let mut set = sample_set();
        assert!(set.check().is_ok());

        set.push(TrainingExample::new(FeatureVector::encode(100.0, 1, 20), f64::NAN));
        let err = set.check().unwrap_err();
        assert_eq!(err.location, "example 3");

    }

    #[test]
    fn test_check_accepts_negative_label() {
        let air = TrainingExample::new(FeatureVector::encode(1000.0, 2, 20), -5.0);
        assert!(air.check(0).is_ok());
    }

    #[test]
    fn test_check_rejects_infinite_distance() {
        let example = TrainingExample::new(FeatureVector::encode(f64::INFINITY, 1, 20), 4.0);
        assert!(example.check(0).is_err());
    }
}
