//! Command-line parsing for the revenue analysis pipeline.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the cleaning/metrics/forecast code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "revcast",
    version,
    about = "Monthly revenue analysis and forecasting"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clean a CSV, compute metrics, forecast 3 months, and print a report.
    Analyze(AnalyzeArgs),
    /// Clean a CSV and print the cleaned series as JSON (for scripting).
    Clean(CleanArgs),
    /// Forecast from a JSON payload file (`-` reads stdin).
    Forecast(ForecastArgs),
    /// Generate a synthetic monthly revenue CSV for trying the tool.
    Sample(SampleArgs),
}

/// Options for the full analysis run.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Path to the input CSV.
    pub csv: PathBuf,

    /// Print the combined result as JSON instead of the formatted report.
    #[arg(long)]
    pub json: bool,

    /// Write the combined result JSON to a file.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Skip the terminal chart of history + forecast.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,
}

/// Options for `revcast clean`.
#[derive(Debug, Parser, Clone)]
pub struct CleanArgs {
    /// Path to the input CSV.
    pub csv: PathBuf,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Options for `revcast forecast`.
#[derive(Debug, Parser, Clone)]
pub struct ForecastArgs {
    /// JSON payload file; use `-` to read stdin.
    pub input: PathBuf,
}

/// Options for `revcast sample`.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Output CSV path.
    pub out: PathBuf,

    /// Number of months to generate.
    #[arg(long, default_value_t = 24)]
    pub months: usize,

    /// Random seed (fixed seed, fixed file).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First calendar year of the series.
    #[arg(long, default_value_t = 2023)]
    pub start_year: i32,

    /// Baseline monthly revenue.
    #[arg(long, default_value_t = 8000.0)]
    pub base_revenue: f64,

    /// Month-over-month trend factor.
    #[arg(long, default_value_t = 0.015)]
    pub growth: f64,

    /// Seasonal swing as a fraction of the baseline.
    #[arg(long, default_value_t = 0.12)]
    pub seasonal_amplitude: f64,

    /// Multiplicative noise level.
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    /// Probability of an interior revenue cell being left blank.
    #[arg(long, default_value_t = 0.08)]
    pub missing_prob: f64,

    /// Use decorated headers and mixed date formats.
    #[arg(long)]
    pub messy: bool,

    /// Skip the expenses column.
    #[arg(long)]
    pub no_expenses: bool,
}
