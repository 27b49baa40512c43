//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the cleaning/metrics/forecast pipeline
//! - prints reports/plots or machine-readable JSON
//! - writes optional exports

use std::fs;
use std::io::Read;
use std::path::Path;

use clap::Parser;

use crate::cli::{AnalyzeArgs, CleanArgs, Cli, Command, ForecastArgs, SampleArgs};
use crate::data::sample::{SampleConfig, generate_sample_csv};
use crate::domain::AnalysisConfig;
use crate::error::PipelineError;
use crate::io::ingest::read_raw_table;
use crate::plot::render_revenue_chart;
use crate::report::{format_analysis_summary, format_forecast_line};

pub mod pipeline;

/// Entry point for the `revcast` binary.
pub fn run() -> Result<(), PipelineError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Clean(args) => handle_clean(args),
        Command::Forecast(args) => handle_forecast(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), PipelineError> {
    let config = AnalysisConfig {
        csv_path: args.csv,
        emit_json: args.json,
        export: args.export,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
    };

    let output = pipeline::run_analysis(&config)?;

    if config.emit_json {
        println!("{}", to_pretty_json(&output)?);
    } else {
        print!("{}", format_analysis_summary(&output));
        if config.plot {
            println!();
            print!(
                "{}",
                render_revenue_chart(
                    &output.cleaned_data,
                    &output.forecast.forecast,
                    config.plot_width,
                    config.plot_height,
                )
            );
        }
    }

    if let Some(path) = &config.export {
        write_text(path, &to_pretty_json(&output)?)?;
        eprintln!("Wrote {}", path.display());
    }

    Ok(())
}

fn handle_clean(args: CleanArgs) -> Result<(), PipelineError> {
    let table = read_raw_table(&args.csv)?;
    let cleaned = pipeline::resolve_and_clean(&table)?;
    let json = if args.pretty {
        to_pretty_json(&cleaned)?
    } else {
        serde_json::to_string(&cleaned).map_err(json_error)?
    };
    println!("{json}");
    Ok(())
}

fn handle_forecast(args: ForecastArgs) -> Result<(), PipelineError> {
    let payload = if args.input.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| PipelineError::Io {
                detail: format!("Failed to read stdin: {e}"),
            })?;
        buffer
    } else {
        fs::read_to_string(&args.input).map_err(|e| PipelineError::Io {
            detail: format!("Failed to read '{}': {e}", args.input.display()),
        })?
    };

    match pipeline::forecast_series(&payload) {
        Ok(result) => {
            println!("{}", to_pretty_json(&result)?);
            eprintln!("{}", format_forecast_line(&result));
            Ok(())
        }
        Err(err) => {
            // The forecast subcommand is a transport surface: the failure is
            // still reported as a structured object on stdout, while the
            // process exit code carries the error class.
            println!("{}", err.to_report());
            Err(err)
        }
    }
}

fn handle_sample(args: SampleArgs) -> Result<(), PipelineError> {
    let config = SampleConfig {
        months: args.months,
        seed: args.seed,
        start_year: args.start_year,
        base_revenue: args.base_revenue,
        monthly_growth: args.growth,
        seasonal_amplitude: args.seasonal_amplitude,
        noise_level: args.noise,
        missing_prob: args.missing_prob,
        messy: args.messy,
        with_expenses: !args.no_expenses,
    };
    let csv = generate_sample_csv(&config)?;
    write_text(&args.out, &csv)?;
    eprintln!("Wrote {} ({} months)", args.out.display(), config.months);
    Ok(())
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, PipelineError> {
    serde_json::to_string_pretty(value).map_err(json_error)
}

fn json_error(e: serde_json::Error) -> PipelineError {
    PipelineError::Io {
        detail: format!("Failed to serialize output JSON: {e}"),
    }
}

fn write_text(path: &Path, contents: &str) -> Result<(), PipelineError> {
    fs::write(path, contents).map_err(|e| PipelineError::Io {
        detail: format!("Failed to write '{}': {e}", path.display()),
    })
}
