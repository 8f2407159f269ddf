//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{ExtrapolationRecord, FitConfig};
use crate::fit::criteria::half_life_years;
use crate::fit::selection::{DomainFit, min_aic_index};
use crate::io::ingest::IngestedData;

/// Format the run header: dataset stats + run settings.
pub fn format_run_summary(ingest: &IngestedData, config: &FitConfig) -> String {
    let mut out = String::new();

    out.push_str("=== esp - ESP trend fits ===\n");
    match &config.csv_path {
        Some(path) => out.push_str(&format!("Input: {}\n", path.display())),
        None => out.push_str("Input: synthetic demo data\n"),
    }
    out.push_str(&format!(
        "Rows: read={} used={} excluded={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.row_errors.len()
    ));
    out.push_str(&format!(
        "Points: n={} | domains={} | year=[{:.1}, {:.1}] | ESP=[{:.3}, {:.3}]\n",
        ingest.stats.n_points,
        ingest.stats.n_domains,
        ingest.stats.year_min,
        ingest.stats.year_max,
        ingest.stats.esp_min,
        ingest.stats.esp_max,
    ));
    out.push_str(&format!(
        "Bootstrap: B={} seed={} | piecewise min-points={}\n",
        config.n_boot, config.seed, config.min_points
    ));

    if !ingest.row_errors.is_empty() {
        out.push_str("\nExcluded rows:\n");
        const MAX_SHOWN: usize = 8;
        for err in ingest.row_errors.iter().take(MAX_SHOWN) {
            match &err.domain {
                Some(domain) => {
                    out.push_str(&format!("  line {} [{}]: {}\n", err.line, domain, err.message))
                }
                None => out.push_str(&format!("  line {}: {}\n", err.line, err.message)),
            }
        }
        if ingest.row_errors.len() > MAX_SHOWN {
            out.push_str(&format!(
                "  ... and {} more\n",
                ingest.row_errors.len() - MAX_SHOWN
            ));
        }
    }

    out
}

/// Format per-domain model diagnostics.
///
/// The minimum-AIC model in each domain is starred. Models that produced no
/// fit are listed with their skip reason; they have no row in any export.
pub fn format_domain_fits(domain_fits: &[DomainFit]) -> String {
    let mut out = String::new();

    for df in domain_fits {
        out.push_str(&format!("\nDomain: {}\n", df.domain));

        let best = min_aic_index(&df.fits);
        for (i, fit) in df.fits.iter().enumerate() {
            let chosen = if Some(i) == best { "*" } else { " " };
            out.push_str(&format!(
                "{chosen} {:<22} n={:<3} r2={:<8} aic={:<9} bic={:<9} half-life={}\n",
                fit.model.display_name(),
                fit.n,
                fmt_val(fit.r2),
                fmt_val(fit.aic),
                fmt_val(fit.bic),
                fmt_val(half_life_years(fit)),
            ));
            out.push_str(&format!("    params: {}\n", fmt_params(fit)));
        }
        for (kind, reason) in &df.skipped {
            out.push_str(&format!("  (skipped {}) {reason}\n", kind.display_name()));
        }
    }

    out
}

/// Format the extrapolation table.
pub fn format_extrapolations(records: &[ExtrapolationRecord]) -> String {
    let mut out = String::new();

    out.push_str("\nYear-of-target extrapolations (exponential fits):\n");
    if records.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }

    out.push_str(&format!(
        "{:<20} {:>12} {:>14} {:>16}\n",
        "domain", "target_esp", "target_log10", "projected_year"
    ));
    for r in records {
        out.push_str(&format!(
            "{:<20} {:>12} {:>14.3} {:>16.1}\n",
            truncate(&r.domain, 20),
            r.target_esp,
            r.target_log10_esp,
            r.projected_year,
        ));
    }

    out
}

fn fmt_val(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.3}"),
        Some(_) => "nan".to_string(),
        None => "-".to_string(),
    }
}

fn fmt_params(fit: &crate::domain::FitResult) -> String {
    let parts: Vec<String> = fit
        .params
        .iter()
        .map(|(name, value)| {
            match (fit.ci_low.get(name), fit.ci_high.get(name)) {
                (Some(lo), Some(hi)) if lo.is_finite() && hi.is_finite() => {
                    format!("{name}={value:.4} [{lo:.4}, {hi:.4}]")
                }
                _ => format!("{name}={value:.4}"),
            }
        })
        .collect();
    parts.join(", ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitResult, ModelKind};
    use std::collections::BTreeMap;

    fn domain_fit() -> DomainFit {
        let mut params = BTreeMap::new();
        params.insert("intercept".to_string(), 99.0);
        params.insert("slope".to_string(), -0.05);
        DomainFit {
            domain: "maize".to_string(),
            fits: vec![
                FitResult {
                    domain: "maize".to_string(),
                    model: ModelKind::Exponential,
                    n: 6,
                    params: params.clone(),
                    ci_low: BTreeMap::new(),
                    ci_high: BTreeMap::new(),
                    r2: Some(0.99),
                    aic: Some(-20.0),
                    bic: Some(-20.4),
                    notes: String::new(),
                },
                FitResult {
                    domain: "maize".to_string(),
                    model: ModelKind::Wright,
                    n: 6,
                    params,
                    ci_low: BTreeMap::new(),
                    ci_high: BTreeMap::new(),
                    r2: Some(0.70),
                    aic: Some(-3.0),
                    bic: Some(-3.4),
                    notes: String::new(),
                },
            ],
            skipped: vec![(ModelKind::Logistic, "Negative log10(ESP) response present.".to_string())],
        }
    }

    #[test]
    fn stars_min_aic_model() {
        let text = format_domain_fits(&[domain_fit()]);
        assert!(text.contains("* exponential"));
        assert!(text.contains("  wright"));
        assert!(text.contains("(skipped logistic)"));
    }

    #[test]
    fn extrapolation_table_lists_records() {
        let records = vec![ExtrapolationRecord {
            domain: "maize".to_string(),
            model: ModelKind::Exponential,
            target_esp: 1.0,
            target_log10_esp: 0.0,
            projected_year: 1980.0,
        }];
        let text = format_extrapolations(&records);
        assert!(text.contains("maize"));
        assert!(text.contains("1980.0"));
    }

    #[test]
    fn empty_extrapolations_say_none() {
        assert!(format_extrapolations(&[]).contains("(none)"));
    }
}
