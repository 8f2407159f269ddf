//! Bootstrap confidence intervals for the linear trend fits.
//!
//! Resampling-with-replacement over observation indices, re-fitting the
//! line per resample. Degenerate resamples (zero covariate variance,
//! singular solve) are discarded; the surviving `(intercept, slope)` pairs
//! give componentwise empirical 2.5/97.5 percentile bounds.
//!
//! The RNG is an explicitly passed handle, never ambient state: the
//! pipeline derives one seeded stream per domain so concurrent fits stay
//! reproducible.

use std::collections::BTreeMap;

use rand::Rng;
use rand::rngs::StdRng;

use crate::math::{linear_trend, percentile, std_dev};

/// Default resample count, matching the original analysis.
pub const DEFAULT_RESAMPLES: usize = 500;

/// Componentwise lower/upper 95% bounds keyed by parameter name.
#[derive(Debug, Clone)]
pub struct BootstrapBounds {
    pub lower: BTreeMap<String, f64>,
    pub upper: BTreeMap<String, f64>,
}

/// Bootstrap 95% bounds for `intercept` and `slope`.
///
/// If no resample survives (e.g. a constant covariate), both bounds are NaN
/// for both parameters. That is a reportable degeneracy, not an error: the
/// caller still gets a result row, just with undefined bounds.
pub fn bootstrap_linear_ci(x: &[f64], y: &[f64], n_boot: usize, rng: &mut StdRng) -> BootstrapBounds {
    let n = x.len();
    let mut intercepts = Vec::with_capacity(n_boot);
    let mut slopes = Vec::with_capacity(n_boot);

    let mut x_boot = vec![0.0; n];
    let mut y_boot = vec![0.0; n];

    for _ in 0..n_boot {
        for i in 0..n {
            let j = rng.gen_range(0..n);
            x_boot[i] = x[j];
            y_boot[i] = y[j];
        }
        if std_dev(&x_boot) <= 0.0 {
            continue;
        }
        let Some(fit) = linear_trend(&x_boot, &y_boot) else {
            continue;
        };
        intercepts.push(fit.intercept);
        slopes.push(fit.slope);
    }

    if intercepts.is_empty() {
        let nan_bounds: BTreeMap<String, f64> = [
            ("intercept".to_string(), f64::NAN),
            ("slope".to_string(), f64::NAN),
        ]
        .into_iter()
        .collect();
        return BootstrapBounds {
            lower: nan_bounds.clone(),
            upper: nan_bounds,
        };
    }

    let mut lower = BTreeMap::new();
    let mut upper = BTreeMap::new();
    lower.insert("intercept".to_string(), percentile(&intercepts, 2.5));
    lower.insert("slope".to_string(), percentile(&slopes, 2.5));
    upper.insert("intercept".to_string(), percentile(&intercepts, 97.5));
    upper.insert("slope".to_string(), percentile(&slopes, 97.5));

    BootstrapBounds { lower, upper }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn bounds_straddle_point_estimate_on_noisy_line() {
        // y = 1 + 2x with deterministic perturbations.
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, &xi)| 1.0 + 2.0 * xi + if i % 2 == 0 { 0.3 } else { -0.3 })
            .collect();

        let point = linear_trend(&x, &y).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = bootstrap_linear_ci(&x, &y, DEFAULT_RESAMPLES, &mut rng);

        for (name, estimate) in [("intercept", point.intercept), ("slope", point.slope)] {
            let lo = bounds.lower[name];
            let hi = bounds.upper[name];
            assert!(lo.is_finite() && hi.is_finite());
            assert!(lo <= estimate + 1e-9, "{name}: {lo} > {estimate}");
            assert!(estimate <= hi + 1e-9, "{name}: {estimate} > {hi}");
        }
    }

    #[test]
    fn exact_line_collapses_bounds_onto_estimate() {
        let x: Vec<f64> = (0..10).map(|i| 1900.0 + 20.0 * i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&xi| 99.0 - 0.05 * xi).collect();

        let mut rng = StdRng::seed_from_u64(42);
        let bounds = bootstrap_linear_ci(&x, &y, 200, &mut rng);

        assert!((bounds.lower["slope"] + 0.05).abs() < 1e-8);
        assert!((bounds.upper["slope"] + 0.05).abs() < 1e-8);
    }

    #[test]
    fn all_degenerate_resamples_give_nan_bounds() {
        // Constant covariate: every resample has zero variance.
        let x = [2000.0; 6];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];

        let mut rng = StdRng::seed_from_u64(1);
        let bounds = bootstrap_linear_ci(&x, &y, 100, &mut rng);

        assert!(bounds.lower["intercept"].is_nan());
        assert!(bounds.lower["slope"].is_nan());
        assert!(bounds.upper["intercept"].is_nan());
        assert!(bounds.upper["slope"].is_nan());
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let x: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&xi| 0.5 - 0.1 * xi + (xi * 0.7).sin() * 0.05).collect();

        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        let a = bootstrap_linear_ci(&x, &y, 50, &mut rng_a);
        let b = bootstrap_linear_ci(&x, &y, 50, &mut rng_b);

        assert_eq!(a.lower, b.lower);
        assert_eq!(a.upper, b.upper);
    }
}
