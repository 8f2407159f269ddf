//! Logistic fit by (k, x0) grid search.
//!
//! Model: `log10(ESP) = L / (1 + exp(k * (year - x0)))`. For fixed
//! `(k, x0)` the asymptote `L` enters linearly, so each grid cell reduces
//! to a one-dimensional weighted projection solved in closed form:
//!
//! `L* = (w · y) / (w · w)` with `w_i = 1 / (1 + exp(k * (x_i - x0)))`
//!
//! Cells are evaluated independently (parallel) and the minimum-SSE cell
//! wins, ties broken by the lowest grid index so results are deterministic
//! regardless of evaluation order.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::domain::{FitResult, ModelKind};
use crate::fit::criteria::aic_bic_from_sse;
use crate::fit::grid::{lin_space, log_space};

/// Growth-rate grid: 25 log-spaced points over [1e-4, 1e-1] per year.
const K_MIN: f64 = 1e-4;
const K_MAX: f64 = 1e-1;
const K_STEPS: usize = 25;

/// Midpoint grid: 25 linear points spanning the observed year range.
const X0_STEPS: usize = 25;

/// Clip bound for the sigmoid exponent; `exp(±710)` overflows f64.
const EXP_CLIP: f64 = 700.0;

#[derive(Debug, Clone, Copy)]
struct Candidate {
    idx: usize,
    k: f64,
    x0: f64,
    l_max: f64,
    sse: f64,
}

fn sigmoid_weights(x: &[f64], k: f64, x0: f64) -> Vec<f64> {
    x.iter()
        .map(|&xi| {
            let exponent = (k * (xi - x0)).clamp(-EXP_CLIP, EXP_CLIP);
            1.0 / (1.0 + exponent.exp())
        })
        .collect()
}

fn evaluate_cell(idx: usize, k: f64, x0: f64, x: &[f64], y: &[f64]) -> Option<Candidate> {
    let w = sigmoid_weights(x, k, x0);

    let denom: f64 = w.iter().map(|&wi| wi * wi).sum();
    if denom == 0.0 {
        return None;
    }

    let l_max: f64 = w.iter().zip(y.iter()).map(|(&wi, &yi)| wi * yi).sum::<f64>() / denom;
    // The response is a log-ratio of a positive quantity; a negative
    // asymptote is outside the model.
    if l_max < 0.0 {
        return None;
    }

    let sse: f64 = w
        .iter()
        .zip(y.iter())
        .map(|(&wi, &yi)| {
            let r = yi - l_max * wi;
            r * r
        })
        .sum();

    if !sse.is_finite() {
        return None;
    }

    Some(Candidate { idx, k, x0, l_max, sse })
}

/// Fit the logistic family over the fixed 25×25 grid.
///
/// Returns `None` when the family is inapplicable (any negative response)
/// or when no grid cell admits a valid non-negative-asymptote solution.
pub fn fit_logistic(domain: &str, x: &[f64], y: &[f64]) -> Option<FitResult> {
    if x.is_empty() || y.len() != x.len() {
        return None;
    }
    if y.iter().any(|&yi| yi < 0.0) {
        return None;
    }

    let x_min = x.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(x_min.is_finite() && x_max.is_finite() && x_max >= x_min) {
        return None;
    }

    let k_grid = log_space(K_MIN, K_MAX, K_STEPS);
    let x0_grid = lin_space(x_min, x_max, X0_STEPS);

    let cells: Vec<(usize, f64, f64)> = k_grid
        .iter()
        .flat_map(|&k| x0_grid.iter().map(move |&x0| (k, x0)))
        .enumerate()
        .map(|(idx, (k, x0))| (idx, k, x0))
        .collect();

    let candidates: Vec<Candidate> = cells
        .par_iter()
        .filter_map(|&(idx, k, x0)| evaluate_cell(idx, k, x0, x, y))
        .collect();

    // Deterministic selection: minimum SSE, ties broken by grid index.
    let mut best: Option<&Candidate> = None;
    for c in &candidates {
        match best {
            None => best = Some(c),
            Some(b) if c.sse < b.sse || (c.sse == b.sse && c.idx < b.idx) => best = Some(c),
            Some(_) => {}
        }
    }
    let best = best?;

    let mut params = BTreeMap::new();
    params.insert("l_max".to_string(), best.l_max);
    params.insert("k".to_string(), best.k);
    params.insert("x0".to_string(), best.x0);

    let criteria = aic_bic_from_sse(best.sse, x.len(), ModelKind::Logistic.param_count());

    Some(FitResult {
        domain: domain.to_string(),
        model: ModelKind::Logistic,
        n: x.len(),
        params,
        ci_low: BTreeMap::new(),
        ci_high: BTreeMap::new(),
        r2: None,
        aic: criteria.map(|(aic, _)| aic),
        bic: criteria.map(|(_, bic)| bic),
        notes: "Grid-search logistic fit: log10_ESP = L / (1 + exp(k*(year - x0)))".to_string(),
    })
}
