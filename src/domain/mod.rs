//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - normalized ESP observation points (`EspPoint`, `Observation`, `DomainSample`)
//! - fit outputs (`FitResult`, `ExtrapolationRecord`)
//! - run configuration (`FitConfig`)

pub mod types;

pub use types::*;
