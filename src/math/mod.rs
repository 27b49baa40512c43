//! Numeric and text primitives shared across the pipeline.
//!
//! - descriptive statistics and rounding (`stats`)
//! - sequence-similarity scoring for header matching (`similarity`)
//! - least-squares solver for lag regressions (`ols`)

pub mod ols;
pub mod similarity;
pub mod stats;

pub use ols::*;
pub use similarity::*;
pub use stats::*;
