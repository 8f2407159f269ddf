//! Shared "fit pipeline" logic used by both subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest (or demo generation) -> group by domain -> per-domain fits ->
//! extrapolations
//!
//! The CLI layer then focuses on presentation (printing and exports).
//!
//! Domains are fit in parallel. Each domain's bootstrap draws from its own
//! RNG stream, seeded by hashing the run seed with the domain label, so the
//! output is identical whether domains run on one thread or many.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::domain::{DomainSample, ExtrapolationRecord, FitConfig};
use crate::error::AppError;
use crate::fit::criteria::extrapolations;
use crate::fit::selection::{DomainFit, fit_domain};
use crate::io::ingest::{IngestedData, group_by_domain};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub samples: Vec<DomainSample>,
    pub domain_fits: Vec<DomainFit>,
    pub extrapolations: Vec<ExtrapolationRecord>,
}

/// Execute the fitting pipeline on already-ingested data.
pub fn run_fit(ingest: IngestedData, config: &FitConfig) -> Result<RunOutput, AppError> {
    validate_config(config)?;

    let samples = group_by_domain(&ingest.points);

    let domain_fits: Vec<DomainFit> = samples
        .par_iter()
        .map(|sample| {
            let mut rng = StdRng::seed_from_u64(domain_seed(config.seed, &sample.domain));
            fit_domain(sample, config, &mut rng)
        })
        .collect();

    let mut records = Vec::new();
    for df in &domain_fits {
        for fit in &df.fits {
            records.extend(extrapolations(fit, &config.targets_esp));
        }
    }

    Ok(RunOutput {
        ingest,
        samples,
        domain_fits,
        extrapolations: records,
    })
}

fn validate_config(config: &FitConfig) -> Result<(), AppError> {
    if config.n_boot == 0 {
        return Err(AppError::usage("Bootstrap resample count must be > 0."));
    }
    if config.min_points == 0 {
        return Err(AppError::usage("Piecewise min-points must be > 0."));
    }
    if config.targets_esp.is_empty() {
        return Err(AppError::usage("At least one extrapolation target is required."));
    }
    for &target in &config.targets_esp {
        if !(target.is_finite() && target > 0.0) {
            return Err(AppError::usage(format!(
                "Extrapolation target {target} is invalid (must be finite and > 0)."
            )));
        }
    }
    Ok(())
}

/// Independent per-domain seed derived from the run seed.
fn domain_seed(run_seed: u64, domain: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    run_seed.hash(&mut hasher);
    domain.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EspPoint;

    fn point(domain: &str, year: f64, esp: f64) -> EspPoint {
        EspPoint {
            domain: domain.to_string(),
            year,
            esp,
            log10_esp: esp.log10(),
        }
    }

    fn config() -> FitConfig {
        FitConfig {
            csv_path: None,
            n_boot: 50,
            seed: 42,
            min_points: 3,
            targets_esp: vec![10.0, 1.0],
            plot: false,
            plot_width: 100,
            plot_height: 25,
            export_fits: None,
            export_piecewise: None,
            export_extrapolations: None,
            export_json: None,
        }
    }

    fn two_domain_ingest() -> IngestedData {
        let mut points = Vec::new();
        for i in 0..8 {
            let year = 1900.0 + 10.0 * i as f64;
            points.push(point("alpha", year, 10.0_f64.powf(4.0 - 0.03 * (year - 1900.0))));
            points.push(point("beta", year, 10.0_f64.powf(3.0 - 0.05 * (year - 1900.0))));
        }
        IngestedData::from_points(points).unwrap()
    }

    #[test]
    fn pipeline_fits_each_domain() {
        let out = run_fit(two_domain_ingest(), &config()).unwrap();
        assert_eq!(out.samples.len(), 2);
        assert_eq!(out.domain_fits.len(), 2);
        assert!(out.domain_fits.iter().all(|df| !df.fits.is_empty()));
        // Each domain has an exponential fit with two targets.
        assert_eq!(out.extrapolations.len(), 4);
    }

    #[test]
    fn pipeline_is_deterministic() {
        let a = run_fit(two_domain_ingest(), &config()).unwrap();
        let b = run_fit(two_domain_ingest(), &config()).unwrap();

        for (da, db) in a.domain_fits.iter().zip(b.domain_fits.iter()) {
            assert_eq!(da.domain, db.domain);
            assert_eq!(da.fits.len(), db.fits.len());
            for (fa, fb) in da.fits.iter().zip(db.fits.iter()) {
                assert_eq!(fa.params, fb.params);
                assert_eq!(fa.ci_low, fb.ci_low);
                assert_eq!(fa.ci_high, fb.ci_high);
            }
        }
    }

    #[test]
    fn bad_target_is_a_usage_error() {
        let mut cfg = config();
        cfg.targets_esp = vec![0.0];
        let err = run_fit(two_domain_ingest(), &cfg).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
