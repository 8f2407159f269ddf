//! Trend-model fitting.
//!
//! Responsibilities:
//!
//! - fit each candidate family (exponential, Wright, piecewise, logistic)
//! - bootstrap confidence intervals for the linear families
//! - information criteria, half-life, and year-of-target extrapolation
//! - per-domain orchestration with eligibility guardrails

pub mod bootstrap;
pub mod criteria;
pub mod grid;
pub mod linear;
pub mod logistic;
pub mod piecewise;
pub mod selection;

pub use bootstrap::*;
pub use criteria::*;
pub use grid::*;
pub use linear::*;
pub use logistic::*;
pub use piecewise::*;
pub use selection::*;
