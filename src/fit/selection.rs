//! Per-domain fitting orchestration.
//!
//! A domain group is fit by every family that is numerically eligible:
//!
//! 1. Gate the whole group: at least [`MIN_OBSERVATIONS`] points and
//!    non-zero year variance, or nothing is attempted.
//! 2. Fit exponential and Wright (always applicable past the gate).
//! 3. Attempt piecewise and logistic, which can individually fail.
//!
//! The engine does not pick a winner; it returns every successful fit plus
//! its criteria and lets callers rank by AIC/BIC. Families that produced no
//! fit are recorded with a reason for diagnostics, but stay absent from the
//! exported tables.

use rand::rngs::StdRng;

use crate::domain::{DomainSample, FitConfig, FitResult, ModelKind};
use crate::fit::linear::{fit_exponential, fit_wright};
use crate::fit::logistic::fit_logistic;
use crate::fit::piecewise::fit_piecewise;

/// Minimum observations before any family is attempted for a domain.
pub const MIN_OBSERVATIONS: usize = 5;

/// All fits (and non-fits) for one domain.
#[derive(Debug, Clone)]
pub struct DomainFit {
    pub domain: String,
    pub fits: Vec<FitResult>,
    /// Families that produced no result and why (for diagnostics only).
    pub skipped: Vec<(ModelKind, String)>,
}

/// Fit every eligible family for one domain.
///
/// Pure in everything except the RNG handle, which feeds the bootstrap;
/// callers give each domain its own seeded stream so domains can be fit
/// concurrently without losing reproducibility.
pub fn fit_domain(sample: &DomainSample, config: &FitConfig, rng: &mut StdRng) -> DomainFit {
    let domain = sample.domain.as_str();
    let x = sample.years();
    let y = sample.responses();

    let mut fits = Vec::new();
    let mut skipped = Vec::new();

    let n = x.len();
    if n < MIN_OBSERVATIONS {
        let reason = format!("Too few observations: n={n} < {MIN_OBSERVATIONS}.");
        for kind in ModelKind::ALL {
            skipped.push((kind, reason.clone()));
        }
        return DomainFit {
            domain: domain.to_string(),
            fits,
            skipped,
        };
    }
    if crate::math::std_dev(&x) <= 0.0 {
        let reason = "Zero year variance.".to_string();
        for kind in ModelKind::ALL {
            skipped.push((kind, reason.clone()));
        }
        return DomainFit {
            domain: domain.to_string(),
            fits,
            skipped,
        };
    }

    match fit_exponential(domain, &x, &y, config.n_boot, rng) {
        Some(fit) => fits.push(fit),
        None => skipped.push((ModelKind::Exponential, "Degenerate linear fit.".to_string())),
    }

    match fit_wright(domain, &x, &y, config.n_boot, rng) {
        Some(fit) => fits.push(fit),
        None => skipped.push((ModelKind::Wright, "Degenerate linear fit.".to_string())),
    }

    match fit_piecewise(domain, &x, &y, config.min_points) {
        Some(fit) => fits.push(fit),
        None => skipped.push((
            ModelKind::PiecewiseExponential,
            format!(
                "No valid split with >= {} points and year spread per segment.",
                config.min_points
            ),
        )),
    }

    if y.iter().any(|&yi| yi < 0.0) {
        skipped.push((
            ModelKind::Logistic,
            "Negative log10(ESP) response present.".to_string(),
        ));
    } else {
        match fit_logistic(domain, &x, &y) {
            Some(fit) => fits.push(fit),
            None => skipped.push((
                ModelKind::Logistic,
                "No grid cell with a valid non-negative asymptote.".to_string(),
            )),
        }
    }

    DomainFit {
        domain: domain.to_string(),
        fits,
        skipped,
    }
}

/// Index of the minimum-AIC fit, for marking in reports.
///
/// Fits with undefined AIC never win; `None` when no fit has a defined AIC.
pub fn min_aic_index(fits: &[FitResult]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, fit) in fits.iter().enumerate() {
        let Some(aic) = fit.aic else { continue };
        match best {
            None => best = Some((i, aic)),
            Some((_, best_aic)) if aic < best_aic => best = Some((i, aic)),
            Some(_) => {}
        }
    }
    best.map(|(i, _)| i)
}
