//! Read/write results JSON files.
//!
//! Results JSON is the portable representation of a whole run:
//! - every fit (parameters, bounds, criteria) across all domains
//! - the extrapolation records
//! - run metadata (tool name, generation timestamp, targets)
//!
//! Useful for diffing runs and feeding notebooks without re-parsing CSVs.

use std::fs::File;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::domain::{ExtrapolationRecord, FitResult};
use crate::error::AppError;
use crate::fit::selection::DomainFit;

/// On-disk schema for a run's results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsFile {
    pub tool: String,
    pub generated: String,
    pub targets_esp: Vec<f64>,
    pub fits: Vec<FitResult>,
    pub extrapolations: Vec<ExtrapolationRecord>,
}

/// Write a results JSON file.
pub fn write_results_json(
    path: &Path,
    domain_fits: &[DomainFit],
    extrapolations: &[ExtrapolationRecord],
    targets_esp: &[f64],
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create results JSON '{}': {e}",
            path.display()
        ))
    })?;

    let results = ResultsFile {
        tool: "esp".to_string(),
        generated: Local::now().to_rfc3339(),
        targets_esp: targets_esp.to_vec(),
        fits: domain_fits.iter().flat_map(|df| df.fits.iter().cloned()).collect(),
        extrapolations: extrapolations.to_vec(),
    };

    serde_json::to_writer_pretty(file, &results)
        .map_err(|e| AppError::usage(format!("Failed to write results JSON: {e}")))?;

    Ok(())
}

/// Read a results JSON file.
pub fn read_results_json(path: &Path) -> Result<ResultsFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!("Failed to open results JSON '{}': {e}", path.display()))
    })?;
    let results: ResultsFile = serde_json::from_reader(file)
        .map_err(|e| AppError::usage(format!("Invalid results JSON: {e}")))?;
    Ok(results)
}
