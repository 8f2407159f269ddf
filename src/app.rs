//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the CSV (or generates demo data)
//! - runs per-domain fitting + extrapolation
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, DemoArgs, FitArgs, RunArgs};
use crate::data::sample::{DemoSpec, generate_demo_points};
use crate::domain::FitConfig;
use crate::error::AppError;
use crate::fit::selection::min_aic_index;
use crate::io::ingest::{IngestedData, load_esp_points};

pub mod pipeline;

/// Entry point for the `esp` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Demo(args) => handle_demo(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args.run, Some(args.csv.clone()));
    let ingest = load_esp_points(&args.csv)?;
    finish_run(ingest, &config)
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args.run, None);
    let spec = DemoSpec {
        domains: args.domains,
        points_per_domain: args.points_per_domain,
        seed: args.run.seed,
        noise: args.noise,
    };
    let ingest = IngestedData::from_points(generate_demo_points(&spec)?)?;
    finish_run(ingest, &config)
}

fn finish_run(ingest: IngestedData, config: &FitConfig) -> Result<(), AppError> {
    let run = pipeline::run_fit(ingest, config)?;

    println!("{}", crate::report::format_run_summary(&run.ingest, config));
    println!("{}", crate::report::format_domain_fits(&run.domain_fits));
    println!("{}", crate::report::format_extrapolations(&run.extrapolations));

    if config.plot {
        for (sample, df) in run.samples.iter().zip(run.domain_fits.iter()) {
            let starred = min_aic_index(&df.fits).map(|i| &df.fits[i]);
            let exponential = df
                .fits
                .iter()
                .find(|f| f.model == crate::domain::ModelKind::Exponential)
                .or(starred);
            let plot = crate::plot::render_domain_plot(
                sample,
                exponential,
                config.plot_width,
                config.plot_height,
            );
            println!("{plot}");
        }
    }

    if let Some(path) = &config.export_fits {
        crate::io::export::write_fits_csv(path, &run.domain_fits)?;
    }
    if let Some(path) = &config.export_piecewise {
        crate::io::export::write_piecewise_csv(path, &run.domain_fits)?;
    }
    if let Some(path) = &config.export_extrapolations {
        crate::io::export::write_extrapolations_csv(path, &run.extrapolations)?;
    }
    if let Some(path) = &config.export_json {
        crate::io::results::write_results_json(
            path,
            &run.domain_fits,
            &run.extrapolations,
            &config.targets_esp,
        )?;
    }

    Ok(())
}

pub fn fit_config_from_args(args: &RunArgs, csv_path: Option<std::path::PathBuf>) -> FitConfig {
    FitConfig {
        csv_path,
        n_boot: args.boot,
        seed: args.seed,
        min_points: args.min_points,
        targets_esp: args.targets.clone(),
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
        export_fits: args.export_fits.clone(),
        export_piecewise: args.export_piecewise.clone(),
        export_extrapolations: args.export_extrapolations.clone(),
        export_json: args.export_json.clone(),
    }
}
