//! Holdout accuracy metrics.

use serde::{Deserialize, Serialize};
use shipeta_types::TrainingSet;

use crate::Estimator;

/// Regression accuracy of an estimator on a labeled set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Number of examples scored.
    pub samples: usize,
    /// Mean absolute error in days.
    pub mae: f64,
    /// Root mean squared error in days.
    pub rmse: f64,
    /// Coefficient of determination (1.0 is a perfect fit; 0.0 when labels are constant).
    pub r2: f64,
}

impl Evaluation {
    /// Scores `estimator` against every example in `set`.
    ///
    /// Returns `None` for an empty set.
    #[must_use]
    pub fn of(estimator: &(impl Estimator + ?Sized), set: &TrainingSet) -> Option<Self> {
        if set.is_empty() {
            return None;
        }

        let n = set.len() as f64;
        let mean = set.iter().map(|e| e.delivery_days).sum::<f64>() / n;

        let (abs, sq, total) = set.iter().fold((0.0, 0.0, 0.0), |(abs, sq, total), e| {
            let residual = e.delivery_days - estimator.predict(&e.features);
            let centered = e.delivery_days - mean;
            (abs + residual.abs(), sq + residual * residual, total + centered * centered)
        });

        let r2 = if total > 0.0 { 1.0 - sq / total } else { 0.0 };

        Some(Self {
            samples: set.len(),
            mae: abs / n,
            rmse: (sq / n).sqrt(),
            r2,
        })
    }
}

impl std::fmt::Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MAE {:.3} days, RMSE {:.3} days, R² {:.4} ({} samples)",
            self.mae, self.rmse, self.r2, self.samples
        )
    }
}
