//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for comparisons across runs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Candidate trend-model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// `log10(ESP) ~ intercept + slope * year`.
    Exponential,
    /// Experience curve: `log10(ESP) ~ intercept + slope * log10(rank)`,
    /// where rank is the 1-based position after sorting by year.
    Wright,
    /// Two independent linear segments joined at a searched breakpoint year.
    PiecewiseExponential,
    /// `log10(ESP) = L / (1 + exp(k * (year - x0)))`, grid-searched.
    Logistic,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Exponential,
        ModelKind::Wright,
        ModelKind::PiecewiseExponential,
        ModelKind::Logistic,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Exponential => "exponential",
            ModelKind::Wright => "wright",
            ModelKind::PiecewiseExponential => "piecewise_exponential",
            ModelKind::Logistic => "logistic",
        }
    }

    /// Parameter count charged against AIC/BIC.
    pub fn param_count(self) -> usize {
        match self {
            // intercept + slope
            ModelKind::Exponential | ModelKind::Wright => 2,
            // two intercepts + two slopes (the breakpoint is not charged,
            // matching the original comparison convention)
            ModelKind::PiecewiseExponential => 4,
            // L, k, x0
            ModelKind::Logistic => 3,
        }
    }
}

/// A single normalized input record: one measured ESP value in one domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EspPoint {
    pub domain: String,
    /// Calendar-year estimate parsed from the record's time period.
    pub year: f64,
    /// Raw measured quantity; strictly positive.
    pub esp: f64,
    /// `log10(esp)`, the response actually fitted.
    pub log10_esp: f64,
}

/// One fitting observation: `(covariate, response)`.
///
/// For exponential/logistic/piecewise fits the covariate is the calendar
/// year; the Wright fit derives its own `log10(rank)` covariate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub year: f64,
    pub log10_esp: f64,
}

/// All observations for one domain, sorted by year ascending.
#[derive(Debug, Clone)]
pub struct DomainSample {
    pub domain: String,
    pub observations: Vec<Observation>,
}

impl DomainSample {
    /// Build a sample from unsorted observations (sorts by year ascending).
    pub fn new(domain: impl Into<String>, mut observations: Vec<Observation>) -> Self {
        observations.sort_by(|a, b| a.year.partial_cmp(&b.year).unwrap_or(std::cmp::Ordering::Equal));
        Self {
            domain: domain.into(),
            observations,
        }
    }

    pub fn years(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.year).collect()
    }

    pub fn responses(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.log10_esp).collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Output of one fitter for one domain.
///
/// Immutable once built; bound maps are empty for families without a
/// bootstrap procedure (logistic, piecewise). `aic`/`bic` are absent when
/// the criterion is undefined (zero SSE or empty sample).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    pub domain: String,
    pub model: ModelKind,
    pub n: usize,
    pub params: BTreeMap<String, f64>,
    pub ci_low: BTreeMap<String, f64>,
    pub ci_high: BTreeMap<String, f64>,
    /// Defined only for the plain linear fits; NaN when the response is constant.
    pub r2: Option<f64>,
    pub aic: Option<f64>,
    pub bic: Option<f64>,
    /// Free-text description of the functional form.
    pub notes: String,
}

impl FitResult {
    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.get(name).copied()
    }
}

/// Projected year at which an exponential fit crosses a target ESP value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtrapolationRecord {
    pub domain: String,
    pub model: ModelKind,
    pub target_esp: f64,
    pub target_log10_esp: f64,
    pub projected_year: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Input CSV; `None` when running on generated demo data.
    pub csv_path: Option<PathBuf>,

    /// Bootstrap resample count for linear-fit confidence intervals.
    pub n_boot: usize,
    /// Run seed; per-domain RNG streams are derived from it.
    pub seed: u64,
    /// Minimum observations per segment in the breakpoint search.
    pub min_points: usize,
    /// Raw ESP target values for year-of-target extrapolation (all > 0).
    pub targets_esp: Vec<f64>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_fits: Option<PathBuf>,
    pub export_piecewise: Option<PathBuf>,
    pub export_extrapolations: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

/// Summary stats about the points actually used for fitting.
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub n_points: usize,
    pub n_domains: usize,
    pub year_min: f64,
    pub year_max: f64,
    pub esp_min: f64,
    pub esp_max: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_sample_sorts_by_year() {
        let sample = DomainSample::new(
            "d",
            vec![
                Observation { year: 1990.0, log10_esp: 1.0 },
                Observation { year: 1950.0, log10_esp: 3.0 },
                Observation { year: 1970.0, log10_esp: 2.0 },
            ],
        );
        assert_eq!(sample.years(), vec![1950.0, 1970.0, 1990.0]);
        assert_eq!(sample.responses(), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn model_kind_serializes_snake_case() {
        let s = serde_json::to_string(&ModelKind::PiecewiseExponential).unwrap();
        assert_eq!(s, "\"piecewise_exponential\"");
    }

    #[test]
    fn param_counts() {
        assert_eq!(ModelKind::Exponential.param_count(), 2);
        assert_eq!(ModelKind::Wright.param_count(), 2);
        assert_eq!(ModelKind::PiecewiseExponential.param_count(), 4);
        assert_eq!(ModelKind::Logistic.param_count(), 3);
    }
}
