//! Ordinary least squares regression.
//!
//! Fits `days = b0 + b1*distance_km + b2*transport_mode + b3*container_type`
//! by SVD, which also copes with rank-deficient designs (e.g. a training set
//! holding a single container size) by returning the minimum-norm solution.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use shipeta_types::{FEATURE_COUNT, FeatureVector, TrainingSet};

use crate::{Estimator, Fit, ModelError};

/// Linear model over the raw feature codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    intercept: f64,
    coefficients: [f64; FEATURE_COUNT],
}

impl LinearRegression {
    /// Creates a model from known parameters.
    #[must_use]
    pub const fn new(intercept: f64, coefficients: [f64; FEATURE_COUNT]) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }

    /// Returns the intercept.
    #[must_use]
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Returns the coefficients in feature order.
    #[must_use]
    pub const fn coefficients(&self) -> &[f64; FEATURE_COUNT] {
        &self.coefficients
    }

    /// Checks that every parameter is finite.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidStructure`] if a parameter is NaN or infinite.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.intercept.is_finite() || self.coefficients.iter().any(|b| !b.is_finite()) {
            return Err(ModelError::InvalidStructure(format!(
                "linear parameters are not finite: intercept {}, coefficients {:?}",
                self.intercept, self.coefficients
            )));
        }
        Ok(())
    }
}

impl Fit for LinearRegression {
    type Config = ();

    fn fit(_config: &(), set: &TrainingSet) -> Result<Self, ModelError> {
        if set.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        set.check()?;

        let rows = set.feature_rows();
        let n = rows.len();
        let x = DMatrix::from_fn(n, FEATURE_COUNT + 1, |r, c| {
            if c == 0 { 1.0 } else { rows[r][c - 1] }
        });
        let y = DVector::from_vec(set.labels());

        let beta = solve_least_squares(&x, &y).ok_or(ModelError::Degenerate)?;
        let model = Self::new(beta[0], [beta[1], beta[2], beta[3]]);
        tracing::debug!(
            intercept = model.intercept,
            coefficients = ?model.coefficients,
            "linear model fitted"
        );
        Ok(model)
    }
}

impl Estimator for LinearRegression {
    fn predict(&self, features: &FeatureVector) -> f64 {
        self.intercept
            + features
                .to_array()
                .iter()
                .zip(&self.coefficients)
                .map(|(x, b)| x * b)
                .sum::<f64>()
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}

/// Solves `min ||x b - y||` by SVD, loosening the tolerance until the
/// solution is finite.
fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);
    [1e-10, 1e-8, 1e-6].iter().find_map(|&tol| {
        svd.solve(y, tol)
            .ok()
            .filter(|beta| beta.iter().all(|v| v.is_finite()))
    })
}
