//! The two plain linear families: exponential and Wright.
//!
//! Both are the same OLS fit under different covariate conventions:
//!
//! - **exponential** — covariate is the calendar year
//! - **Wright** (experience curve) — covariate is `log10(rank)`, where rank
//!   is the 1-based position of each observation after sorting by year
//!   (cumulative count of prior + current observations)
//!
//! These are the only families that get bootstrap confidence intervals:
//! re-running a closed-form line fit per resample is cheap, which is not
//! true of the logistic grid search.

use std::collections::BTreeMap;

use rand::rngs::StdRng;

use crate::domain::{FitResult, ModelKind};
use crate::fit::bootstrap::bootstrap_linear_ci;
use crate::fit::criteria::aic_bic_from_sse;
use crate::math::linear_trend;

/// Fit `log10(ESP) ~ intercept + slope * year`.
///
/// Returns `None` only on a degenerate covariate; the per-domain gate
/// normally rules that out before this is called.
pub fn fit_exponential(domain: &str, x: &[f64], y: &[f64], n_boot: usize, rng: &mut StdRng) -> Option<FitResult> {
    let trend = linear_trend(x, y)?;
    let bounds = bootstrap_linear_ci(x, y, n_boot, rng);

    Some(assemble_linear_result(
        domain,
        ModelKind::Exponential,
        x.len(),
        trend.intercept,
        trend.slope,
        trend.sse,
        trend.r2,
        bounds.lower,
        bounds.upper,
        "log10_ESP ~ intercept + slope * year",
    ))
}

/// Fit the Wright experience curve `log10(ESP) ~ intercept + slope * log10(rank)`.
///
/// Observations are ranked by year ascending; the bootstrap resamples the
/// derived `(log10(rank), response)` pairs, ranks are not recomputed per
/// resample.
pub fn fit_wright(domain: &str, x: &[f64], y: &[f64], n_boot: usize, rng: &mut StdRng) -> Option<FitResult> {
    let n = x.len();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| x[a].partial_cmp(&x[b]).unwrap_or(std::cmp::Ordering::Equal));

    let x_rank: Vec<f64> = (1..=n).map(|rank| (rank as f64).log10()).collect();
    let y_ordered: Vec<f64> = order.iter().map(|&i| y[i]).collect();

    let trend = linear_trend(&x_rank, &y_ordered)?;
    let bounds = bootstrap_linear_ci(&x_rank, &y_ordered, n_boot, rng);

    Some(assemble_linear_result(
        domain,
        ModelKind::Wright,
        n,
        trend.intercept,
        trend.slope,
        trend.sse,
        trend.r2,
        bounds.lower,
        bounds.upper,
        "log10_ESP ~ intercept + slope * log10(cumulative_points)",
    ))
}

#[allow(clippy::too_many_arguments)]
fn assemble_linear_result(
    domain: &str,
    model: ModelKind,
    n: usize,
    intercept: f64,
    slope: f64,
    sse: f64,
    r2: f64,
    ci_low: BTreeMap<String, f64>,
    ci_high: BTreeMap<String, f64>,
    notes: &str,
) -> FitResult {
    let mut params = BTreeMap::new();
    params.insert("intercept".to_string(), intercept);
    params.insert("slope".to_string(), slope);

    let criteria = aic_bic_from_sse(sse, n, model.param_count());

    FitResult {
        domain: domain.to_string(),
        model,
        n,
        params,
        ci_low,
        ci_high,
        r2: Some(r2),
        aic: criteria.map(|(aic, _)| aic),
        bic: criteria.map(|(_, bic)| bic),
        notes: notes.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn exponential_recovers_perfect_decay() {
        // y = 99 - 0.05x, i.e. 4 - 0.05*(x - 1900).
        let x = [1900.0, 1920.0, 1940.0, 1960.0, 1980.0, 2000.0];
        let y = [4.0, 3.0, 2.0, 1.0, 0.0, -1.0];

        let mut rng = StdRng::seed_from_u64(42);
        let fit = fit_exponential("dom", &x, &y, 200, &mut rng).unwrap();

        assert_eq!(fit.model, ModelKind::Exponential);
        assert_eq!(fit.n, 6);
        assert!((fit.param("slope").unwrap() + 0.05).abs() < 1e-9);
        assert!((fit.param("intercept").unwrap() - 99.0).abs() < 1e-6);
        let r2 = fit.r2.unwrap();
        assert!((r2 - 1.0).abs() < 1e-9);
        assert!(fit.ci_low["slope"] <= -0.05 + 1e-6);
        assert!(fit.ci_high["slope"] >= -0.05 - 1e-6);
    }

    #[test]
    fn wright_covariate_is_log_rank() {
        // Response drops by 1 per log10(rank) unit: slope should be -1.
        let x = [1900.0, 1910.0, 1920.0, 1930.0, 1940.0, 1950.0];
        let y: Vec<f64> = (1..=6).map(|rank| 2.0 - (rank as f64).log10()).collect();

        let mut rng = StdRng::seed_from_u64(3);
        let fit = fit_wright("dom", &x, &y, 100, &mut rng).unwrap();

        assert_eq!(fit.model, ModelKind::Wright);
        assert!((fit.param("slope").unwrap() + 1.0).abs() < 1e-9);
        assert!((fit.param("intercept").unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn wright_ignores_input_order() {
        // Same points, shuffled: ranks follow year order, so the fit is identical.
        let x = [1950.0, 1900.0, 1940.0, 1910.0, 1930.0, 1920.0];
        let y_by_rank: Vec<f64> = (1..=6).map(|rank| 2.0 - (rank as f64).log10()).collect();
        // Map responses back onto the shuffled year order.
        let mut year_rank: Vec<(f64, usize)> = x.iter().copied().zip(0..).collect();
        year_rank.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        let mut y = vec![0.0; 6];
        for (rank, &(_, original_idx)) in year_rank.iter().enumerate() {
            y[original_idx] = y_by_rank[rank];
        }

        let mut rng = StdRng::seed_from_u64(3);
        let fit = fit_wright("dom", &x, &y, 100, &mut rng).unwrap();
        assert!((fit.param("slope").unwrap() + 1.0).abs() < 1e-9);
    }
}
