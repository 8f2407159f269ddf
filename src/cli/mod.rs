//! Command-line parsing for the ESP trend fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "esp", version, about = "ESP trend-model fitter (exponential / Wright / piecewise / logistic)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit trend models to an ESP CSV, print diagnostics, and optionally export.
    Fit(FitArgs),
    /// Fit trend models to a generated synthetic dataset (no input file needed).
    Demo(DemoArgs),
}

/// Options for fitting a CSV dataset.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Input CSV with `domain`, `time_period`, `esp` columns.
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Options for the synthetic demo dataset.
#[derive(Debug, Parser, Clone)]
pub struct DemoArgs {
    /// Number of synthetic domains to generate.
    #[arg(long, default_value_t = 3)]
    pub domains: usize,

    /// Observations per synthetic domain.
    #[arg(long, default_value_t = 12)]
    pub points_per_domain: usize,

    /// Standard deviation of the log10-scale noise.
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Options shared by `fit` and `demo`.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Bootstrap resample count for linear-fit confidence intervals.
    #[arg(long, default_value_t = 500)]
    pub boot: usize,

    /// Run seed (also seeds demo generation; per-domain streams derive from it).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Minimum observations per segment in the breakpoint search.
    #[arg(long, default_value_t = 3)]
    pub min_points: usize,

    /// Raw ESP target values for year-of-target extrapolation.
    #[arg(long, value_delimiter = ',', default_values_t = [10.0, 1.0])]
    pub targets: Vec<f64>,

    /// Render an ASCII plot per domain.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the fit table to CSV.
    #[arg(long = "export-fits", value_name = "CSV")]
    pub export_fits: Option<PathBuf>,

    /// Export the breakpoint-fit table to CSV.
    #[arg(long = "export-piecewise", value_name = "CSV")]
    pub export_piecewise: Option<PathBuf>,

    /// Export the extrapolation table to CSV.
    #[arg(long = "export-extrapolations", value_name = "CSV")]
    pub export_extrapolations: Option<PathBuf>,

    /// Export all results (fits + extrapolations + metadata) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}
