//! Grid generation for the logistic search.
//!
//! The logistic family is fit by a deterministic grid search rather than a
//! gradient solver:
//!
//! - no local-minima surprises, identical results given identical inputs
//! - the asymptote is linear given `(k, x0)`, so each cell is a cheap
//!   closed-form solve and a modest grid is fast enough

/// `steps` log-spaced points between `min` and `max` (inclusive).
///
/// Requires finite `0 < min < max` and `steps >= 2`; the callers in this
/// crate only pass fixed compile-time constants.
pub fn log_space(min: f64, max: f64, steps: usize) -> Vec<f64> {
    debug_assert!(min.is_finite() && max.is_finite() && min > 0.0 && max > min);
    debug_assert!(steps >= 2);

    let ln_min = min.ln();
    let ln_max = max.ln();

    (0..steps)
        .map(|i| {
            let u = i as f64 / (steps as f64 - 1.0);
            (ln_min + u * (ln_max - ln_min)).exp()
        })
        .collect()
}

/// `steps` linearly spaced points between `min` and `max` (inclusive).
///
/// Endpoints are hit exactly; a degenerate range (`min == max`) yields the
/// same value repeated.
pub fn lin_space(min: f64, max: f64, steps: usize) -> Vec<f64> {
    debug_assert!(min.is_finite() && max.is_finite() && max >= min);
    debug_assert!(steps >= 2);

    (0..steps)
        .map(|i| {
            let u = i as f64 / (steps as f64 - 1.0);
            min + u * (max - min)
        })
        .collect()
}
