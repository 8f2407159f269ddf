//! Mathematical utilities: least-squares fitting and small statistics helpers.

pub mod ols;
pub mod stats;

pub use ols::*;
pub use stats::*;
