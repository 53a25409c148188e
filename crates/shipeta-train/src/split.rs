//! Seeded holdout split.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use shipeta_types::TrainingSet;

use crate::TrainError;

/// Shuffles `set` with `seed` and splits it into `(train, test)`.
///
/// The test side receives `ceil(test_fraction * len)` examples; both sides
/// keep at least one example.
///
/// # Errors
///
/// Returns an error if `test_fraction` is not strictly between 0 and 1, or the
/// set is too small to leave an example on each side.
pub fn train_test_split(
    set: &TrainingSet,
    test_fraction: f64,
    seed: u64,
) -> Result<(TrainingSet, TrainingSet), TrainError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(TrainError::InvalidConfig(format!(
            "test fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    let len = set.len();
    let n_test = (test_fraction * len as f64).ceil() as usize;
    if n_test == 0 || n_test >= len {
        return Err(TrainError::InvalidConfig(format!(
            "cannot hold out {test_fraction} of {len} examples"
        )));
    }

    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));
    let (test, train) = order.split_at(n_test);

    Ok((set.select(train), set.select(test)))
}
