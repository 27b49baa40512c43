//! Synthetic monthly revenue CSV generation.
//!
//! Produces a plausible small-business revenue series: baseline level,
//! gentle trend, yearly seasonality, multiplicative noise, and (optionally)
//! blank interior cells plus decorated headers and mixed date formats, so
//! the generated file exercises the same cleaning paths a real export does.
//!
//! Generation is seeded and fully deterministic for a given config.

use chrono::{Months, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::PipelineError;

/// Settings for one generated CSV.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub months: usize,
    pub seed: u64,
    pub start_year: i32,
    pub base_revenue: f64,
    pub monthly_growth: f64,
    pub seasonal_amplitude: f64,
    pub noise_level: f64,
    pub missing_prob: f64,
    pub messy: bool,
    pub with_expenses: bool,
}

/// Generate the CSV contents.
pub fn generate_sample_csv(config: &SampleConfig) -> Result<String, PipelineError> {
    if config.months == 0 {
        return Err(PipelineError::MalformedInput {
            detail: "sample month count must be > 0".to_string(),
        });
    }
    if !(config.base_revenue.is_finite() && config.base_revenue > 0.0) {
        return Err(PipelineError::MalformedInput {
            detail: "sample base revenue must be finite and > 0".to_string(),
        });
    }
    if !(0.0..1.0).contains(&config.missing_prob) {
        return Err(PipelineError::MalformedInput {
            detail: "sample missing probability must be in [0, 1)".to_string(),
        });
    }
    if !(config.noise_level.is_finite() && config.noise_level >= 0.0) {
        return Err(PipelineError::MalformedInput {
            detail: "sample noise level must be finite and >= 0".to_string(),
        });
    }
    let start =
        NaiveDate::from_ymd_opt(config.start_year, 1, 1).ok_or_else(|| {
            PipelineError::MalformedInput {
                detail: format!("invalid sample start year {}", config.start_year),
            }
        })?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, config.noise_level.max(1e-12)).map_err(|e| {
        PipelineError::MalformedInput {
            detail: format!("invalid sample noise level: {e}"),
        }
    })?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    let headers: Vec<&str> = match (config.messy, config.with_expenses) {
        (true, true) => vec!["Txn Date", "Rev (USD)", "Total Expenses"],
        (true, false) => vec!["Txn Date", "Rev (USD)"],
        (false, true) => vec!["date", "revenue", "expenses"],
        (false, false) => vec!["date", "revenue"],
    };
    writer.write_record(&headers).map_err(write_error)?;

    for i in 0..config.months {
        let date = start + Months::new(i as u32);
        let seasonal = 1.0
            + config.seasonal_amplitude
                * (2.0 * std::f64::consts::PI * (i % 12) as f64 / 12.0).sin();
        let trend = 1.0 + config.monthly_growth * i as f64;
        let level = config.base_revenue * trend * seasonal;
        let revenue = (level * (1.0 + noise.sample(&mut rng))).max(0.0);

        // Interior cells can go blank to exercise interpolation; endpoints
        // always carry a value so the gap stays interior.
        let interior = i != 0 && i != config.months - 1;
        let blank = interior && rng.gen_bool(config.missing_prob);

        let date_cell = format_sample_date(date, config.messy, i);
        let revenue_cell = if blank {
            String::new()
        } else {
            format!("{:.2}", revenue)
        };

        let mut record = vec![date_cell, revenue_cell];
        if config.with_expenses {
            let ratio = rng.gen_range(0.55..0.75);
            record.push(format!("{:.2}", revenue * ratio));
        }
        writer.write_record(&record).map_err(write_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PipelineError::Io {
            detail: format!("Failed to finish sample CSV: {e}"),
        })?;
    String::from_utf8(bytes).map_err(|e| PipelineError::Io {
        detail: format!("Sample CSV was not valid UTF-8: {e}"),
    })
}

fn write_error(e: csv::Error) -> PipelineError {
    PipelineError::Io {
        detail: format!("Failed to write sample CSV row: {e}"),
    }
}

/// Date rendering; messy mode cycles through the formats the cleaner accepts.
fn format_sample_date(date: NaiveDate, messy: bool, index: usize) -> String {
    if !messy {
        return date.format("%Y-%m-%d").to_string();
    }
    match index % 3 {
        0 => date.format("%Y-%m-%d").to_string(),
        1 => date.format("%m/%d/%Y").to_string(),
        _ => date.format("%b %Y").to_string(),
    }
}
