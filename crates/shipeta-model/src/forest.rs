//! Bagged regression-tree ensemble.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use shipeta_types::{FEATURE_COUNT, FeatureVector, TrainingSet};

use crate::{Estimator, Fit, ModelError, RegressionTree, TreeConfig};

/// Default number of trees.
const DEFAULT_TREES: usize = 100;

/// Default random seed.
const DEFAULT_SEED: u64 = 42;

/// Number of features considered at each split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MaxFeatures {
    /// Every feature.
    #[default]
    All,
    /// Square root of the feature count, rounded down (at least one).
    Sqrt,
    /// A fixed number of features, clamped to `1..=feature_count`.
    Count(usize),
}

impl MaxFeatures {
    /// Resolves to a concrete feature count.
    #[must_use]
    pub fn resolve(&self, feature_count: usize) -> usize {
        let k = match self {
            Self::All => feature_count,
            Self::Sqrt => (feature_count as f64).sqrt() as usize,
            Self::Count(n) => *n,
        };
        k.clamp(1, feature_count)
    }
}

/// Hyperparameters for [`RandomForest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the ensemble.
    pub n_trees: usize,
    /// Per-tree growth limits.
    pub tree: TreeConfig,
    /// Whether each tree sees a bootstrap resample of the training set.
    pub bootstrap: bool,
    /// Master seed; every tree seed is drawn from it.
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_TREES,
            tree: TreeConfig::default(),
            bootstrap: true,
            seed: DEFAULT_SEED,
        }
    }
}

impl ForestConfig {
    /// Sets the number of trees.
    #[must_use]
    pub const fn with_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    /// Sets the master seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the maximum tree depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.tree.max_depth = max_depth;
        self
    }

    /// Sets the minimum samples per leaf.
    #[must_use]
    pub const fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.tree.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Sets the number of features considered at each split.
    #[must_use]
    pub const fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.tree.max_features = max_features;
        self
    }

    /// Enables or disables bootstrap resampling.
    #[must_use]
    pub const fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    fn check(&self) -> Result<(), ModelError> {
        if self.n_trees == 0 {
            return Err(ModelError::InvalidConfig("n_trees must be at least 1".into()));
        }
        if self.tree.min_samples_split < 2 {
            return Err(ModelError::InvalidConfig(
                "min_samples_split must be at least 2".into(),
            ));
        }
        if self.tree.min_samples_leaf == 0 {
            return Err(ModelError::InvalidConfig(
                "min_samples_leaf must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Random forest regressor: the mean of bagged CART trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<RegressionTree>,
    feature_importances: [f64; FEATURE_COUNT],
}

impl RandomForest {
    /// Returns the configuration the forest was trained with.
    #[must_use]
    pub const fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Returns the fitted trees.
    #[must_use]
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Returns impurity-based importances in feature order, summing to 1
    /// (all zero if no tree ever split).
    #[must_use]
    pub const fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    /// Checks that the forest holds at least one tree and every tree is
    /// well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidStructure`] naming the first bad tree.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::InvalidStructure("forest has no trees".into()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate().map_err(|err| match err {
                ModelError::InvalidStructure(reason) => {
                    ModelError::InvalidStructure(format!("tree {i}: {reason}"))
                }
                other => other,
            })?;
        }
        if self.feature_importances.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidStructure(
                "forest importances are not finite".into(),
            ));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn from_trees(trees: Vec<RegressionTree>) -> Self {
        Self {
            config: ForestConfig::default().with_trees(trees.len()),
            trees,
            feature_importances: [0.0; FEATURE_COUNT],
        }
    }
}

impl Fit for RandomForest {
    type Config = ForestConfig;

    fn fit(config: &ForestConfig, set: &TrainingSet) -> Result<Self, ModelError> {
        config.check()?;
        if set.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        set.check()?;

        let rows = set.feature_rows();
        let labels = set.labels();
        let n = rows.len();

        // Tree seeds are drawn up front so parallel fitting stays reproducible.
        let mut master = StdRng::seed_from_u64(config.seed);
        let seeds: Vec<u64> = (0..config.n_trees).map(|_| master.next_u64()).collect();

        let trees: Vec<RegressionTree> = seeds
            .par_iter()
            .map(|&seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let indices: Vec<usize> = if config.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                RegressionTree::fit(&rows, &labels, indices, &config.tree, &mut rng)
            })
            .collect();

        let feature_importances = normalized_importances(&trees);
        tracing::debug!(
            trees = trees.len(),
            examples = n,
            importances = ?feature_importances,
            "random forest fitted"
        );

        Ok(Self {
            config: *config,
            trees,
            feature_importances,
        })
    }
}

impl Estimator for RandomForest {
    fn predict(&self, features: &FeatureVector) -> f64 {
        let row = features.to_array();
        let total: f64 = self.trees.iter().map(|t| t.predict_row(&row)).sum();
        total / self.trees.len() as f64
    }

    fn name(&self) -> &'static str {
        "forest"
    }
}

/// Averages per-tree normalized importances, then renormalizes.
fn normalized_importances(trees: &[RegressionTree]) -> [f64; FEATURE_COUNT] {
    let mut acc = [0.0; FEATURE_COUNT];
    for tree in trees {
        let raw = tree.importances();
        let total: f64 = raw.iter().sum();
        if total > 0.0 {
            for (a, r) in acc.iter_mut().zip(raw) {
                *a += r / total;
            }
        }
    }

    let total: f64 = acc.iter().sum();
    if total > 0.0 {
        for a in &mut acc {
            *a /= total;
        }
    }
    acc
}
