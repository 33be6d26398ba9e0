//! Regression error metrics.
//!
//! - `MSE = Σ (y_i - ŷ_i)^2 / n`
//! - `R² = 1 - SS_res / SS_tot`, with `SS_tot = Σ (y_i - ȳ)^2`
//!
//! When the actual values are constant (`SS_tot = 0`) R² is undefined; we report
//! `1.0` for a perfect prediction and `0.0` otherwise so the value stays finite.

use crate::domain::Metrics;

/// Compute MSE and R². Returns `None` for empty or mismatched inputs.
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Option<Metrics> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return None;
    }
    let n = actual.len() as f64;

    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p) * (y - p))
        .sum();
    let mean = actual.iter().sum::<f64>() / n;
    let ss_tot: f64 = actual.iter().map(|y| (y - mean) * (y - mean)).sum();

    let r2 = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    };

    Some(Metrics { mse: ss_res / n, r2 })
}
