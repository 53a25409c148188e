//! CART regression trees.
//!
//! Trees are grown greedily: at every node each candidate feature is sorted
//! and every boundary between two distinct values is scored by the reduction
//! in squared error. Nodes live in a flat arena indexed from the root at 0.

use rand::Rng;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};
use shipeta_types::{FEATURE_COUNT, FeatureVector};

use crate::{MaxFeatures, ModelError};

/// Minimum squared-error reduction for a split to be accepted.
const MIN_GAIN: f64 = 1e-12;

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth, or `None` to grow until leaves are pure.
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs before it may split.
    pub min_samples_split: usize,
    /// Minimum samples on each side of a split.
    pub min_samples_leaf: usize,
    /// Features considered at each split.
    pub max_features: MaxFeatures,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::All,
        }
    }
}

/// A node in a regression tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Terminal node predicting the mean label of its samples.
    Leaf {
        /// Predicted value.
        value: f64,
        /// Number of training samples that reached this leaf.
        samples: usize,
    },
    /// Internal node routing on `x[feature] <= threshold`.
    Split {
        /// Feature index in [`shipeta_types::FEATURE_NAMES`] order.
        feature: usize,
        /// Split threshold.
        threshold: f64,
        /// Arena index of the `<=` child.
        left: usize,
        /// Arena index of the `>` child.
        right: usize,
    },
}

/// A fitted regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    /// Total squared-error reduction contributed by each feature.
    importances: [f64; FEATURE_COUNT],
}

impl RegressionTree {
    /// Grows a tree over the rows selected by `indices`.
    ///
    /// `indices` may contain repeats (bootstrap samples). The `rng` drives
    /// feature subsampling and must be seeded by the caller for
    /// reproducible trees.
    ///
    /// # Panics
    ///
    /// Panics if `indices` is empty or references a row outside `rows`.
    #[must_use]
    pub fn fit<R: Rng>(
        rows: &[[f64; FEATURE_COUNT]],
        labels: &[f64],
        mut indices: Vec<usize>,
        config: &TreeConfig,
        rng: &mut R,
    ) -> Self {
        assert!(!indices.is_empty(), "cannot grow a tree from zero samples");

        let mut builder = TreeBuilder {
            rows,
            labels,
            config,
            rng,
            nodes: Vec::new(),
            importances: [0.0; FEATURE_COUNT],
        };
        builder.grow(&mut indices, 0);

        Self {
            nodes: builder.nodes,
            importances: builder.importances,
        }
    }

    /// Predicts the value for a numeric feature row.
    #[must_use]
    pub fn predict_row(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value, .. } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    // NaN compares false and falls to the right child.
                    idx = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    /// Predicts the value for a feature vector.
    #[must_use]
    pub fn predict(&self, features: &FeatureVector) -> f64 {
        self.predict_row(&features.to_array())
    }

    /// Returns the node arena (root first).
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Returns the depth of the deepest leaf (a lone root has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0, 0)];
        while let Some((idx, depth)) = stack.pop() {
            match self.nodes.get(idx) {
                Some(Node::Split { left, right, .. }) => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
                Some(Node::Leaf { .. }) => deepest = deepest.max(depth),
                None => {}
            }
        }
        deepest
    }

    /// Checks that the arena is a well-formed tree.
    ///
    /// Every split must name a known feature and point at two children stored
    /// after it, so traversal from the root always reaches a leaf. Leaf values
    /// must be finite.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidStructure`] describing the first bad node.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::InvalidStructure("tree has no nodes".into()));
        }
        let len = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Leaf { value, .. } if !value.is_finite() => {
                    return Err(ModelError::InvalidStructure(format!(
                        "leaf {idx} has non-finite value {value}"
                    )));
                }
                Node::Leaf { .. } => {}
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= FEATURE_COUNT {
                        return Err(ModelError::InvalidStructure(format!(
                            "split {idx} uses feature {feature}, expected < {FEATURE_COUNT}"
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(ModelError::InvalidStructure(format!(
                            "split {idx} has a NaN threshold"
                        )));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= len {
                            return Err(ModelError::InvalidStructure(format!(
                                "split {idx} points at node {child}, expected {} to {}",
                                idx + 1,
                                len - 1
                            )));
                        }
                    }
                }
            }
        }
        if self.importances.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidStructure(
                "tree importances are not finite".into(),
            ));
        }
        Ok(())
    }

    /// Returns the raw squared-error reduction per feature.
    #[must_use]
    pub const fn importances(&self) -> &[f64; FEATURE_COUNT] {
        &self.importances
    }

    #[cfg(test)]
    pub(crate) const fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            importances: [0.0; FEATURE_COUNT],
        }
    }
}

/// Best split found for a node.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct TreeBuilder<'a, R> {
    rows: &'a [[f64; FEATURE_COUNT]],
    labels: &'a [f64],
    config: &'a TreeConfig,
    rng: &'a mut R,
    nodes: Vec<Node>,
    importances: [f64; FEATURE_COUNT],
}

impl<R: Rng> TreeBuilder<'_, R> {
    /// Grows the subtree for `indices` and returns its arena index.
    fn grow(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let n = indices.len();
        let (sum, sum_sq) = indices.iter().fold((0.0, 0.0), |(s, sq), &i| {
            let y = self.labels[i];
            (s + y, sq + y * y)
        });
        let mean = sum / n as f64;
        let sse = (sum_sq - sum * sum / n as f64).max(0.0);

        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: mean,
            samples: n,
        });

        let depth_reached = self.config.max_depth.is_some_and(|max| depth >= max);
        if depth_reached
            || n < self.config.min_samples_split
            || n < 2 * self.config.min_samples_leaf
            || sse <= MIN_GAIN
        {
            return id;
        }

        let Some(split) = self.best_split(indices, sum, sse) else {
            return id;
        };

        self.importances[split.feature] += split.gain;

        let mid = partition(indices, |i| self.rows[i][split.feature] <= split.threshold);
        let (left_idx, right_idx) = indices.split_at_mut(mid);
        let left = self.grow(left_idx, depth + 1);
        let right = self.grow(right_idx, depth + 1);

        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    fn best_split(&mut self, indices: &[usize], sum: f64, sse: f64) -> Option<Candidate> {
        let n = indices.len();
        let min_leaf = self.config.min_samples_leaf.max(1);
        let k = self.config.max_features.resolve(FEATURE_COUNT);
        let features = sample(&mut *self.rng, FEATURE_COUNT, k).into_vec();

        let mut best: Option<Candidate> = None;
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature in features {
            pairs.clear();
            pairs.extend(indices.iter().map(|&i| (self.rows[i][feature], self.labels[i])));
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            for split_at in 1..n {
                left_sum += pairs[split_at - 1].1;

                let lo = pairs[split_at - 1].0;
                let hi = pairs[split_at].0;
                if lo >= hi {
                    continue;
                }

                let left_n = split_at;
                let right_n = n - split_at;
                if left_n < min_leaf || right_n < min_leaf {
                    continue;
                }

                let right_sum = sum - left_sum;
                // Child SSE = sum_sq - ls^2/ln - rs^2/rn; parent SSE = sum_sq - s^2/n.
                let child_sse = sse + sum * sum / n as f64
                    - left_sum * left_sum / left_n as f64
                    - right_sum * right_sum / right_n as f64;
                let gain = sse - child_sse.max(0.0);

                if gain > MIN_GAIN && best.is_none_or(|b| gain > b.gain) {
                    let mut threshold = lo + (hi - lo) / 2.0;
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(Candidate {
                        feature,
                        threshold,
                        gain,
                    });
                }
            }
        }

        best
    }
}

/// Reorders `indices` so entries satisfying `pred` come first; returns their count.
fn partition(indices: &mut [usize], pred: impl Fn(usize) -> bool) -> usize {
    let mut mid = 0;
    for j in 0..indices.len() {
        if pred(indices[j]) {
            indices.swap(mid, j);
            mid += 1;
        }
    }
    mid
}
