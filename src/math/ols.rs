//! Ordinary least squares for a single covariate.
//!
//! Every model family in this crate reduces to repeated small linear solves:
//! the exponential and Wright fits are one straight line each, the piecewise
//! fit is two lines per candidate split, and the bootstrap re-runs the same
//! solve per resample.
//!
//! Implementation choices:
//! - The covariate is centered about its mean before solving and the
//!   intercept is re-expanded afterwards. Calendar years (~2e3) against
//!   log10 responses (~1e0) would otherwise give a poorly conditioned
//!   normal system.
//! - The 2-column system is solved via SVD, which stays robust for tall
//!   matrices and near-collinear columns. Parameter dimension is tiny, so
//!   SVD cost is irrelevant.

use nalgebra::{DMatrix, DVector};

use crate::math::stats::std_dev;

/// A fitted line `y ≈ intercept + slope * x` plus its fit quality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub intercept: f64,
    pub slope: f64,
    pub sse: f64,
    /// `1 - SSE/SST`; NaN when the response is constant (SST = 0).
    pub r2: f64,
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if the strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y ≈ intercept + slope * x` by ordinary least squares.
///
/// Returns `None` when the fit is degenerate: fewer than two points,
/// mismatched lengths, zero covariate variance, or a singular solve.
/// Callers treat `None` as "skip this candidate", never as a fatal error.
pub fn linear_trend(x: &[f64], y: &[f64]) -> Option<LinearTrend> {
    let n = x.len();
    if n < 2 || y.len() != n {
        return None;
    }
    if std_dev(x) <= 0.0 {
        return None;
    }

    let x_mean = x.iter().sum::<f64>() / n as f64;

    let mut design = DMatrix::<f64>::zeros(n, 2);
    for (i, &xi) in x.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = xi - x_mean;
    }
    let rhs = DVector::from_column_slice(y);

    let beta = solve_least_squares(&design, &rhs)?;
    let slope = beta[1];
    let intercept = beta[0] - slope * x_mean;

    let mut sse = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let r = yi - (intercept + slope * xi);
        sse += r * r;
    }

    let y_mean = y.iter().sum::<f64>() / n as f64;
    let sst: f64 = y.iter().map(|&yi| (yi - y_mean) * (yi - y_mean)).sum();
    let r2 = if sst > 0.0 { 1.0 - sse / sst } else { f64::NAN };

    if !(intercept.is_finite() && slope.is_finite() && sse.is_finite()) {
        return None;
    }

    Some(LinearTrend {
        intercept,
        slope,
        sse,
        r2,
    })
}
