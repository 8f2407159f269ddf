//! `esp-trends` library crate.
//!
//! Fits candidate trend models (exponential, Wright experience curve,
//! piecewise exponential, grid-searched logistic) to per-domain
//! "experiments per success" histories, with bootstrap confidence
//! intervals, AIC/BIC comparison, half-lives, and year-of-target
//! extrapolation.
//!
//! The binary (`esp`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (notebooks, future services, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
