//! Benchmark fixtures for shipeta.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shipeta_lib::{
    EstimatorState, FeatureVector, ForestConfig, ModelConfig, SyntheticConfig, TrainingSet,
    generate, train,
};

/// Seed shared by every fixture.
pub const FIXTURE_SEED: u64 = 42;

/// Synthetic training set with `samples` examples.
///
/// # Panics
///
/// Panics if `samples` is zero.
pub fn training_set(samples: usize) -> TrainingSet {
    generate(
        &SyntheticConfig::default()
            .with_samples(samples)
            .with_seed(FIXTURE_SEED),
    )
    .expect("fixture training set")
}

/// Forest configuration with `trees` trees and the fixture seed.
pub fn forest_config(trees: usize) -> ModelConfig {
    ModelConfig::Forest(
        ForestConfig::default()
            .with_trees(trees)
            .with_seed(FIXTURE_SEED),
    )
}

/// Forest with `trees` trees fitted on a 1000-example synthetic set.
///
/// # Panics
///
/// Panics if fitting fails.
pub fn fitted_forest(trees: usize) -> EstimatorState {
    train(&forest_config(trees), &training_set(1000)).expect("fixture forest")
}

/// Random in-domain feature vectors for scoring.
pub fn query_vectors(count: usize) -> Vec<FeatureVector> {
    let mut rng = StdRng::seed_from_u64(FIXTURE_SEED + 1);
    (0..count)
        .map(|_| {
            FeatureVector::encode(
                f64::from(rng.gen_range(300_u32..12_000)),
                rng.gen_range(0..3),
                if rng.gen_bool(0.5) { 20 } else { 40 },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures() {
        assert_eq!(training_set(50).len(), 50);
        let queries = query_vectors(100);
        assert_eq!(queries.len(), 100);
        assert!(queries.iter().all(|v| v.validate().is_ok()));
        assert_eq!(query_vectors(10), query_vectors(10));
    }
}
