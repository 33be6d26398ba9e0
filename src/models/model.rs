//! Fitted linear model.
//!
//! The model is immutable once trained: `predict` only reads the weights.

use serde::Serialize;

use crate::math::OlsSolution;

/// `y = intercept + Σ weight_j · feature_j`, with one named weight per feature column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearModel {
    features: Vec<String>,
    weights: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    /// Build a model from a solver result.
    ///
    /// # Panics
    /// Panics if `features` and the solution disagree on the number of weights.
    pub fn from_solution(features: Vec<String>, solution: OlsSolution) -> Self {
        assert_eq!(
            features.len(),
            solution.weights.len(),
            "one weight per feature"
        );
        Self {
            features,
            weights: solution.weights,
            intercept: solution.intercept,
        }
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Predict one row. `row` must list feature values in `features()` order.
    pub fn predict(&self, row: &[f64]) -> f64 {
        debug_assert_eq!(row.len(), self.weights.len());
        self.intercept
            + self
                .weights
                .iter()
                .zip(row)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }

    /// Weights paired with their feature names.
    pub fn coefficients(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.features
            .iter()
            .map(String::as_str)
            .zip(self.weights.iter().copied())
    }
}
