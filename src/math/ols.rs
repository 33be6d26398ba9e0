//! Ordinary least squares solver.
//!
//! We solve small linear regression problems of the form:
//!
//! ```text
//! minimize Σ (y_i - b - x_i^T w)^2
//! ```
//!
//! Implementation choices:
//! - The intercept `b` is handled by centering: we regress `y - ȳ` on `X - x̄`,
//!   then recover `b = ȳ - x̄^T w`. This keeps the intercept out of the
//!   minimum-norm choice when the system is rank deficient.
//! - We use SVD to solve the least-squares problem robustly for any shape of
//!   design matrix, including more features than rows.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - Singular values below a tolerance relative to the largest one are treated
//!   as zero, which yields the minimum-norm solution for collinear features.

use nalgebra::{DMatrix, DVector};

/// Weights and intercept of a fitted linear model.
#[derive(Debug, Clone, PartialEq)]
pub struct OlsSolution {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);
    let max_sv = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    if max_sv == 0.0 {
        // All-zero design: every weight vector fits equally well, the smallest is zero.
        return Some(DVector::zeros(x.ncols()));
    }

    let base = max_sv * x.nrows().max(x.ncols()) as f64 * f64::EPSILON;

    // Try progressively looser tolerances if strict solve fails.
    for &scale in &[1.0, 1e2, 1e4] {
        if let Ok(beta) = svd.solve(y, base * scale) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y ≈ b + X w` by ordinary least squares.
///
/// `x` is `n × p` (one row per observation). Returns `None` when `x` and `y`
/// disagree on `n`, `n == 0`, or the solve fails.
pub fn fit_ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<OlsSolution> {
    let n = x.nrows();
    if n == 0 || y.len() != n {
        return None;
    }

    let y_mean = y.mean();
    let p = x.ncols();
    if p == 0 {
        return Some(OlsSolution {
            weights: Vec::new(),
            intercept: y_mean,
        });
    }

    let x_mean: Vec<f64> = (0..p).map(|j| x.column(j).mean()).collect();
    let xc = DMatrix::from_fn(n, p, |i, j| x[(i, j)] - x_mean[j]);
    let yc = y.map(|v| v - y_mean);

    let w = solve_least_squares(&xc, &yc)?;
    let intercept = y_mean - x_mean.iter().zip(w.iter()).map(|(m, wj)| m * wj).sum::<f64>();

    Some(OlsSolution {
        weights: w.iter().copied().collect(),
        intercept,
    })
}
