//! Synthetic training data.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use shipeta_types::{ContainerType, FeatureVector, TrainingExample, TrainingSet, TransportMode};

use crate::TrainError;

/// Settings for the synthetic generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticConfig {
    /// Number of examples to generate.
    pub samples: usize,
    /// Smallest distance in km (inclusive).
    pub distance_min: u32,
    /// Largest distance in km (exclusive).
    pub distance_max: u32,
    /// Seed for the single random stream that draws features and noise.
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            distance_min: 300,
            distance_max: 12_000,
            seed: 42,
        }
    }
}

impl SyntheticConfig {
    /// Sets the number of examples.
    #[must_use]
    pub const fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Sets the seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the distance range `[min, max)`.
    #[must_use]
    pub const fn with_distance_range(mut self, min: u32, max: u32) -> Self {
        self.distance_min = min;
        self.distance_max = max;
        self
    }
}

/// Inclusive lower and exclusive upper bound of the label noise, in days.
const NOISE_DAYS: (u32, u32) = (1, 5);

/// The ground-truth delivery-time rule behind the synthetic data.
///
/// `distance_km / 500`, plus 10 days for sea freight, minus 8 days for air
/// freight, plus `noise_days`.
#[must_use]
pub fn delivery_days(distance_km: f64, mode: TransportMode, noise_days: u32) -> f64 {
    let offset = match mode {
        TransportMode::Sea => 10.0,
        TransportMode::Road => 0.0,
        TransportMode::Air => -8.0,
    };
    distance_km / 500.0 + offset + f64::from(noise_days)
}

/// Generates a synthetic training set.
///
/// Every example draws its distance, mode, container and noise from one
/// stream seeded by `config.seed`, so a given configuration always yields the
/// same set.
///
/// # Errors
///
/// Returns an error if the sample count is zero or the distance range is empty.
pub fn generate(config: &SyntheticConfig) -> Result<TrainingSet, TrainError> {
    if config.samples == 0 {
        return Err(TrainError::InvalidConfig("samples must be at least 1".into()));
    }
    if config.distance_min >= config.distance_max {
        return Err(TrainError::InvalidConfig(format!(
            "empty distance range [{}, {})",
            config.distance_min, config.distance_max
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut set = TrainingSet::default();

    for _ in 0..config.samples {
        let distance = f64::from(rng.gen_range(config.distance_min..config.distance_max));
        let mode = *TransportMode::all()
            .choose(&mut rng)
            .unwrap_or(&TransportMode::Road);
        let container = *ContainerType::all()
            .choose(&mut rng)
            .unwrap_or(&ContainerType::Teu20);
        let noise = rng.gen_range(NOISE_DAYS.0..NOISE_DAYS.1);

        set.push(TrainingExample::new(
            FeatureVector::from_typed(distance, mode, container),
            delivery_days(distance, mode, noise),
        ));
    }

    tracing::debug!(
        samples = set.len(),
        seed = config.seed,
        "generated synthetic training set"
    );
    Ok(set)
}
