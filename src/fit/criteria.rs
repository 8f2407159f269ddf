//! Information criteria, half-life, and year-of-target extrapolation.

use crate::domain::{ExtrapolationRecord, FitResult, ModelKind};

/// `AIC = n·ln(SSE/n) + 2k` and `BIC = n·ln(SSE/n) + k·ln(n)`.
///
/// Undefined (returns `None`) when `SSE <= 0` or `n == 0`: degenerate or
/// perfect fits are excluded from criterion comparison rather than treated
/// as infinitely good.
pub fn aic_bic_from_sse(sse: f64, n: usize, k: usize) -> Option<(f64, f64)> {
    if sse <= 0.0 || n == 0 {
        return None;
    }
    let n_f = n as f64;
    let base = n_f * (sse / n_f).ln();
    let aic = base + 2.0 * k as f64;
    let bic = base + k as f64 * n_f.ln();
    Some((aic, bic))
}

/// Years for the fitted ESP value to halve.
///
/// Only meaningful for the exponential model; `None` for other families or
/// a flat (zero-slope) fit.
pub fn half_life_years(fit: &FitResult) -> Option<f64> {
    if fit.model != ModelKind::Exponential {
        return None;
    }
    let slope = fit.param("slope")?;
    if slope == 0.0 {
        return None;
    }
    Some(0.5_f64.log10() / slope)
}

/// Projected years at which an exponential fit crosses each raw ESP target.
///
/// Produces nothing for non-exponential fits or a zero slope; the caller
/// guarantees targets are strictly positive.
pub fn extrapolations(fit: &FitResult, targets_esp: &[f64]) -> Vec<ExtrapolationRecord> {
    if fit.model != ModelKind::Exponential {
        return Vec::new();
    }
    let (Some(intercept), Some(slope)) = (fit.param("intercept"), fit.param("slope")) else {
        return Vec::new();
    };
    if slope == 0.0 {
        return Vec::new();
    }

    targets_esp
        .iter()
        .map(|&target| {
            let target_log10 = target.log10();
            ExtrapolationRecord {
                domain: fit.domain.clone(),
                model: fit.model,
                target_esp: target,
                target_log10_esp: target_log10,
                projected_year: (target_log10 - intercept) / slope,
            }
        })
        .collect()
}
