//! Export fit and extrapolation tables to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or
//! downstream scripts. Column order is deterministic: fixed diagnostic
//! columns first, then one column per parameter name (sorted), each with
//! its lower/upper bound columns. Undefined values (absent parameters,
//! NaN bounds, undefined criteria) are written as empty cells.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::ExtrapolationRecord;
use crate::error::AppError;
use crate::fit::criteria::half_life_years;
use crate::fit::selection::DomainFit;

/// Write the per-(domain, model) fit table.
pub fn write_fits_csv(path: &Path, domain_fits: &[DomainFit]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!("Failed to create fits CSV '{}': {e}", path.display()))
    })?;

    // Union of parameter names across every fit, so rows share one header.
    let mut param_names: BTreeSet<&str> = BTreeSet::new();
    for df in domain_fits {
        for fit in &df.fits {
            param_names.extend(fit.params.keys().map(String::as_str));
        }
    }

    let mut header = String::from("domain,model,n,r2,aic,bic,half_life_years,notes");
    for name in &param_names {
        header.push_str(&format!(",param_{name},param_ci_low_{name},param_ci_high_{name}"));
    }
    writeln!(file, "{header}")
        .map_err(|e| AppError::usage(format!("Failed to write fits CSV header: {e}")))?;

    for df in domain_fits {
        for fit in &df.fits {
            let mut row = format!(
                "{},{},{},{},{},{},{},{}",
                fit.domain,
                fit.model.display_name(),
                fit.n,
                fmt_opt(fit.r2),
                fmt_opt(fit.aic),
                fmt_opt(fit.bic),
                fmt_opt(half_life_years(fit)),
                quote(&fit.notes),
            );
            for name in &param_names {
                row.push(',');
                row.push_str(&fmt_opt(fit.params.get(*name).copied()));
                row.push(',');
                row.push_str(&fmt_opt(fit.ci_low.get(*name).copied()));
                row.push(',');
                row.push_str(&fmt_opt(fit.ci_high.get(*name).copied()));
            }
            writeln!(file, "{row}")
                .map_err(|e| AppError::usage(format!("Failed to write fits CSV row: {e}")))?;
        }
    }

    Ok(())
}

/// Write the piecewise-only table: one row per domain with a breakpoint fit.
///
/// The same rows appear in the full fits table; this narrow view keeps the
/// breakpoint coefficients in fixed columns for downstream plotting.
pub fn write_piecewise_csv(path: &Path, domain_fits: &[DomainFit]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create piecewise CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(
        file,
        "domain,breakpoint,left_intercept,left_slope,right_intercept,right_slope,aic,bic"
    )
    .map_err(|e| AppError::usage(format!("Failed to write piecewise CSV header: {e}")))?;

    for df in domain_fits {
        for fit in &df.fits {
            if fit.model != crate::domain::ModelKind::PiecewiseExponential {
                continue;
            }
            writeln!(
                file,
                "{},{},{},{},{},{},{},{}",
                fit.domain,
                fmt_opt(fit.param("breakpoint")),
                fmt_opt(fit.param("left_intercept")),
                fmt_opt(fit.param("left_slope")),
                fmt_opt(fit.param("right_intercept")),
                fmt_opt(fit.param("right_slope")),
                fmt_opt(fit.aic),
                fmt_opt(fit.bic),
            )
            .map_err(|e| AppError::usage(format!("Failed to write piecewise CSV row: {e}")))?;
        }
    }

    Ok(())
}

/// Write the year-of-target extrapolation table.
pub fn write_extrapolations_csv(path: &Path, records: &[ExtrapolationRecord]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create extrapolations CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "domain,model,target_esp,target_log10_esp,projected_year")
        .map_err(|e| AppError::usage(format!("Failed to write extrapolations CSV header: {e}")))?;

    for r in records {
        writeln!(
            file,
            "{},{},{},{},{:.4}",
            r.domain,
            r.model.display_name(),
            r.target_esp,
            r.target_log10_esp,
            r.projected_year,
        )
        .map_err(|e| AppError::usage(format!("Failed to write extrapolations CSV row: {e}")))?;
    }

    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v}"),
        // NaN bounds (all-degenerate bootstrap) and absent values both
        // export as empty cells.
        _ => String::new(),
    }
}

fn quote(text: &str) -> String {
    if text.contains(',') || text.contains('"') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitResult, ModelKind};
    use std::collections::BTreeMap;

    fn fits_fixture() -> Vec<DomainFit> {
        let mut params = BTreeMap::new();
        params.insert("intercept".to_string(), 99.0);
        params.insert("slope".to_string(), -0.05);
        let mut ci_low = BTreeMap::new();
        ci_low.insert("intercept".to_string(), 98.0);
        ci_low.insert("slope".to_string(), f64::NAN);
        let mut ci_high = BTreeMap::new();
        ci_high.insert("intercept".to_string(), 100.0);
        ci_high.insert("slope".to_string(), f64::NAN);

        vec![DomainFit {
            domain: "maize".to_string(),
            fits: vec![FitResult {
                domain: "maize".to_string(),
                model: ModelKind::Exponential,
                n: 6,
                params,
                ci_low,
                ci_high,
                r2: Some(0.98),
                aic: Some(-12.5),
                bic: Some(-12.9),
                notes: "log10_ESP ~ intercept + slope * year".to_string(),
            }],
            skipped: Vec::new(),
        }]
    }

    #[test]
    fn fits_csv_round_trips_columns() {
        let path = std::env::temp_dir().join(format!("esp-trends-fits-{}.csv", std::process::id()));
        write_fits_csv(&path, &fits_fixture()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("domain,model,n,r2,aic,bic,half_life_years,notes"));
        assert!(header.contains("param_intercept"));
        assert!(header.contains("param_ci_low_slope"));

        let row = lines.next().unwrap();
        assert!(row.starts_with("maize,exponential,6,0.98,-12.5,-12.9,6.02"));
        // NaN slope bounds export as empty cells.
        assert!(row.ends_with(",-0.05,,"));
    }

    #[test]
    fn piecewise_csv_only_lists_breakpoint_fits() {
        let path =
            std::env::temp_dir().join(format!("esp-trends-piecewise-{}.csv", std::process::id()));

        let mut fits = fits_fixture();
        let mut params = BTreeMap::new();
        params.insert("breakpoint".to_string(), 1960.0);
        params.insert("left_intercept".to_string(), 4.0);
        params.insert("left_slope".to_string(), -0.02);
        params.insert("right_intercept".to_string(), 9.0);
        params.insert("right_slope".to_string(), -0.06);
        fits[0].fits.push(FitResult {
            domain: "maize".to_string(),
            model: ModelKind::PiecewiseExponential,
            n: 8,
            params,
            ci_low: BTreeMap::new(),
            ci_high: BTreeMap::new(),
            r2: None,
            aic: Some(-5.0),
            bic: Some(-5.3),
            notes: String::new(),
        });

        write_piecewise_csv(&path, &fits).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        // Header plus the single piecewise row; the exponential fit is excluded.
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "maize,1960,4,-0.02,9,-0.06,-5,-5.3");
    }

    #[test]
    fn extrapolations_csv_format() {
        let path =
            std::env::temp_dir().join(format!("esp-trends-extrap-{}.csv", std::process::id()));
        let records = vec![ExtrapolationRecord {
            domain: "maize".to_string(),
            model: ModelKind::Exponential,
            target_esp: 1.0,
            target_log10_esp: 0.0,
            projected_year: 1980.0,
        }];
        write_extrapolations_csv(&path, &records).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(
            text,
            "domain,model,target_esp,target_log10_esp,projected_year\nmaize,exponential,1,0,1980.0000\n"
        );
    }
}
