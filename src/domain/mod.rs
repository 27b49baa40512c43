//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the canonical cleaned observation (`CanonicalRecord`)
//! - metrics outputs (`MetricsSummary`, `TrendDirection`)
//! - forecast outputs (`ForecastPoint`, `ForecastResult`, `ModelKind`)
//! - run configuration for the CLI front-end (`AnalysisConfig`)

pub mod types;

pub use types::*;
