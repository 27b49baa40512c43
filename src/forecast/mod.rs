//! Revenue forecasting.
//!
//! Responsibilities:
//!
//! - re-validate series handed over the transport boundary (alias field
//!   names, parseable dates, numeric revenue), failing with the specific
//!   error for each precondition in order
//! - align the series onto a monthly-start calendar grid (`resample`)
//! - pick a model by sample size and run it (`ses`, `sarima`)
//! - guard the raw model output (`guardrail`) and assemble the result
//!
//! The forecaster may receive data from a different upstream path than the
//! cleaner, so it resolves its own field names: exact alias matches on the
//! lowercased key, independent of the CSV header resolver.

pub mod guardrail;
pub mod resample;
pub mod sarima;
pub mod ses;

pub use guardrail::apply_guardrails;
pub use resample::resample_monthly;

use chrono::{Months, NaiveDate};
use serde_json::{Map, Value};

use crate::clean::parse_date_permissive;
use crate::domain::{ForecastPoint, ForecastResult, ModelKind};
use crate::error::PipelineError;
use crate::io::transport::parse_series_input;

/// Forecast horizon: always exactly three months.
pub const FORECAST_HORIZON: usize = 3;

/// Minimum usable points, enforced before cleaning, after cleaning, and
/// after resampling.
pub const MIN_FORECAST_POINTS: usize = 3;

/// At this many resampled points the seasonal model takes over from SES.
pub const SEASONAL_MIN_POINTS: usize = 12;

/// Field names accepted for the date column.
const DATE_ALIASES: [&str; 4] = ["date", "month", "period", "time"];

/// Field names accepted for the revenue column.
const REVENUE_ALIASES: [&str; 4] = ["revenue", "amount", "sales", "income"];

/// Raw model output before guardrails: one value per horizon step on each
/// of the mean/lower/upper tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastBands {
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Model choice is a pure function of the resampled sample size.
pub fn select_model(points: usize) -> ModelKind {
    if points < SEASONAL_MIN_POINTS {
        ModelKind::Ses
    } else {
        ModelKind::Sarimax
    }
}

/// Forecast from a text payload (the liberal transport contract).
pub fn forecast_series(input: &str) -> Result<ForecastResult, PipelineError> {
    let records = parse_series_input(input)?;
    forecast_records(&records)
}

/// Forecast from already-parsed record objects.
pub fn forecast_records(
    records: &[Map<String, Value>],
) -> Result<ForecastResult, PipelineError> {
    if records.is_empty() {
        return Err(PipelineError::MalformedInput {
            detail: "series is empty".to_string(),
        });
    }
    if records.len() < MIN_FORECAST_POINTS {
        return Err(PipelineError::InsufficientData {
            observed: records.len(),
            required: MIN_FORECAST_POINTS,
        });
    }

    let (date_key, revenue_key) = resolve_fields(records)?;
    let rows = coerce_rows(records, &date_key, &revenue_key)?;

    let mut observations: Vec<(NaiveDate, f64)> = rows
        .into_iter()
        .filter_map(|(date, revenue)| Some((date?, revenue?)))
        .collect();
    if observations.len() < MIN_FORECAST_POINTS {
        return Err(PipelineError::InsufficientData {
            observed: observations.len(),
            required: MIN_FORECAST_POINTS,
        });
    }

    observations.sort_by_key(|&(date, _)| date);
    let monthly = resample_monthly(&observations);
    if monthly.len() < MIN_FORECAST_POINTS {
        return Err(PipelineError::InsufficientData {
            observed: monthly.len(),
            required: MIN_FORECAST_POINTS,
        });
    }

    let values: Vec<f64> = monthly.iter().map(|&(_, v)| v).collect();
    let data_points = values.len();
    let model_used = select_model(data_points);
    let bands = match model_used {
        ModelKind::Ses => ses::fit_and_forecast(&values, FORECAST_HORIZON),
        ModelKind::Sarimax => sarima::fit_and_forecast(&values, FORECAST_HORIZON),
    };

    let last_actual = values[data_points - 1];
    let last_date = monthly[data_points - 1].0;
    let mean = apply_guardrails(&bands.mean, last_actual);
    let lower = apply_guardrails(&bands.lower, last_actual);
    let upper = apply_guardrails(&bands.upper, last_actual);

    let forecast = (0..FORECAST_HORIZON)
        .map(|step| ForecastPoint {
            date: last_date + Months::new(step as u32 + 1),
            revenue: mean[step],
            conf_lower: lower[step],
            conf_upper: upper[step],
        })
        .collect();

    Ok(ForecastResult {
        model_used,
        data_points,
        forecast,
    })
}

/// Resolve the date/revenue field names by exact alias match.
///
/// Later records can add fields; later alias matches win, mirroring the
/// column scan this replaces upstream.
fn resolve_fields(
    records: &[Map<String, Value>],
) -> Result<(String, String), PipelineError> {
    let mut found: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !found.iter().any(|k| k == key) {
                found.push(key.clone());
            }
        }
    }

    let mut date_key = None;
    let mut revenue_key = None;
    for key in &found {
        let normalized = key.trim().to_lowercase();
        if DATE_ALIASES.contains(&normalized.as_str()) {
            date_key = Some(key.clone());
        } else if REVENUE_ALIASES.contains(&normalized.as_str()) {
            revenue_key = Some(key.clone());
        }
    }

    match (date_key, revenue_key) {
        (Some(date), Some(revenue)) => Ok((date, revenue)),
        (date, revenue) => {
            let mut missing = Vec::new();
            if date.is_none() {
                missing.push("date".to_string());
            }
            if revenue.is_none() {
                missing.push("revenue".to_string());
            }
            Err(PipelineError::ColumnResolution { found, missing })
        }
    }
}

/// Parse dates and coerce revenue per record.
///
/// A date value that is *present but unparseable* fails the whole call with
/// up to three offending samples; absent/null dates and non-numeric revenue
/// just drop their row later.
fn coerce_rows(
    records: &[Map<String, Value>],
    date_key: &str,
    revenue_key: &str,
) -> Result<Vec<(Option<NaiveDate>, Option<f64>)>, PipelineError> {
    let mut offending: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for record in records {
        let date = match record.get(date_key) {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => match parse_date_permissive(raw) {
                Some(date) => Some(date),
                None => {
                    offending.push(raw.clone());
                    None
                }
            },
            Some(other) => {
                offending.push(other.to_string());
                None
            }
        };
        let revenue = record.get(revenue_key).and_then(coerce_revenue);
        rows.push((date, revenue));
    }

    if !offending.is_empty() {
        offending.truncate(3);
        return Err(PipelineError::DateParse { samples: offending });
    }

    Ok(rows)
}

/// Numeric coercion: numbers pass through, numeric strings parse, anything
/// else (and non-finite values) becomes null.
fn coerce_revenue(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    if parsed.is_finite() { Some(parsed) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, revenue: f64) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("date".to_string(), Value::String(date.to_string()));
        map.insert(
            "revenue".to_string(),
            serde_json::Number::from_f64(revenue)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        );
        map
    }

    fn monthly_records(revenues: &[f64]) -> Vec<Map<String, Value>> {
        revenues
            .iter()
            .enumerate()
            .map(|(i, &revenue)| {
                let year = 2022 + (i / 12) as i32;
                let month = 1 + (i % 12) as u32;
                record(&format!("{year}-{month:02}-01"), revenue)
            })
            .collect()
    }

    #[test]
    fn eleven_points_use_ses_twelve_use_the_seasonal_model() {
        let eleven: Vec<f64> = (0..11).map(|i| 100.0 + i as f64).collect();
        let result = forecast_records(&monthly_records(&eleven)).unwrap();
        assert_eq!(result.model_used, ModelKind::Ses);
        assert_eq!(result.data_points, 11);

        let twelve: Vec<f64> = (0..12).map(|i| 100.0 + i as f64).collect();
        let result = forecast_records(&monthly_records(&twelve)).unwrap();
        assert_eq!(result.model_used, ModelKind::Sarimax);
        assert_eq!(result.data_points, 12);
    }

    #[test]
    fn horizon_is_three_sequential_calendar_months() {
        // Last observation in November: the forecast must cross the year
        // boundary on calendar months, not 30-day hops.
        let records: Vec<_> = (0..8)
            .map(|i| record(&format!("2023-{:02}-01", 4 + i), 100.0 + i as f64))
            .collect();
        let result = forecast_records(&records).unwrap();
        let dates: Vec<String> = result
            .forecast
            .iter()
            .map(|p| p.date.format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(dates, vec!["2023-12-01", "2024-01-01", "2024-02-01"]);
    }

    #[test]
    fn ses_path_is_deterministic_across_runs() {
        let revenues = [120.0, 132.0, 101.0, 134.0, 190.0, 150.0, 170.0, 180.0];
        let records = monthly_records(&revenues);
        let first = forecast_records(&records).unwrap();
        let second = forecast_records(&records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn two_records_are_insufficient() {
        let records = monthly_records(&[100.0, 110.0]);
        let err = forecast_records(&records).unwrap_err();
        assert_eq!(
            err,
            PipelineError::InsufficientData {
                observed: 2,
                required: 3
            }
        );
    }

    #[test]
    fn unknown_field_names_fail_resolution_with_found_keys() {
        let mut map = Map::new();
        map.insert("when".to_string(), Value::String("2023-01-01".to_string()));
        map.insert("value".to_string(), Value::from(100));
        let records = vec![map.clone(), map.clone(), map];
        let err = forecast_records(&records).unwrap_err();
        match err {
            PipelineError::ColumnResolution { found, missing } => {
                assert_eq!(found, vec!["value".to_string(), "when".to_string()]);
                assert_eq!(missing, vec!["date".to_string(), "revenue".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn alias_field_names_resolve() {
        let records: Vec<_> = (0..6)
            .map(|i| {
                let mut map = Map::new();
                map.insert(
                    "month".to_string(),
                    Value::String(format!("2023-{:02}-01", i + 1)),
                );
                map.insert("amount".to_string(), Value::from(100 + i));
                map
            })
            .collect();
        let result = forecast_records(&records).unwrap();
        assert_eq!(result.forecast.len(), 3);
    }

    #[test]
    fn unparseable_dates_fail_with_samples() {
        let mut records = monthly_records(&[100.0, 110.0, 120.0, 130.0]);
        records[2].insert(
            "date".to_string(),
            Value::String("soon-ish".to_string()),
        );
        let err = forecast_records(&records).unwrap_err();
        assert_eq!(
            err,
            PipelineError::DateParse {
                samples: vec!["soon-ish".to_string()]
            }
        );
    }

    #[test]
    fn non_numeric_revenue_drops_rows_then_recounts() {
        let mut records = monthly_records(&[100.0, 110.0, 120.0, 130.0]);
        records[0].insert("revenue".to_string(), Value::String("n/a".to_string()));
        records[1].insert("revenue".to_string(), Value::Null);
        let err = forecast_records(&records).unwrap_err();
        assert_eq!(
            err,
            PipelineError::InsufficientData {
                observed: 2,
                required: 3
            }
        );
    }

    #[test]
    fn mid_month_dates_resample_before_fitting() {
        let records: Vec<_> = (0..6)
            .map(|i| record(&format!("2023-{:02}-15", i + 1), 100.0 + i as f64))
            .collect();
        let result = forecast_records(&records).unwrap();
        // Forecast dates continue from the month-start grid.
        assert_eq!(
            result.forecast[0].date.format("%Y-%m-%d").to_string(),
            "2023-07-01"
        );
    }

    #[test]
    fn forecast_values_are_guarded_and_rounded() {
        // Noisy series around a small level: the SES band dips negative and
        // must come back clamped to zero.
        let revenues = [1.0, 100.0, 1.0, 100.0, 1.0, 100.0, 1.0, 100.0];
        let result = forecast_records(&monthly_records(&revenues)).unwrap();
        for point in &result.forecast {
            assert!(point.conf_lower >= 0.0);
            assert!(point.revenue >= point.conf_lower);
            let cents = point.revenue * 100.0;
            assert!((cents - cents.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn revenue_strings_coerce_to_numbers() {
        let records: Vec<_> = (0..6)
            .map(|i| {
                let mut map = Map::new();
                map.insert(
                    "date".to_string(),
                    Value::String(format!("2023-{:02}-01", i + 1)),
                );
                map.insert("revenue".to_string(), Value::String(format!("{}", 100 + i)));
                map
            })
            .collect();
        let result = forecast_records(&records).unwrap();
        assert_eq!(result.data_points, 6);
    }
}
