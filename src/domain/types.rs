//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during cleaning/metrics/forecasting
//! - exchanged as JSON with the orchestration layer
//! - reloaded later for comparisons or exports

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One cleaned monthly observation.
///
/// `date` serializes as `YYYY-MM-DD`; `expenses` is omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub date: NaiveDate,
    pub revenue: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expenses: Option<f64>,
}

/// Direction of the most recent revenue movement.
///
/// Compares the endpoints of the trailing three-observation window only;
/// the middle value is deliberately ignored (a coarse but stable policy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    #[serde(rename = "upward")]
    Upward,
    #[serde(rename = "downward")]
    Downward,
    #[serde(rename = "flat")]
    Flat,
    #[serde(rename = "insufficient data")]
    InsufficientData,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TrendDirection::Upward => "upward",
            TrendDirection::Downward => "downward",
            TrendDirection::Flat => "flat",
            TrendDirection::InsufficientData => "insufficient data",
        };
        write!(f, "{label}")
    }
}

/// Historical performance metrics over a cleaned series.
///
/// All revenue figures are rounded to 2 decimals for presentation. The
/// growth list skips pairs whose previous value is zero, so it may be
/// shorter than `total_months - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub date_range: String,
    pub total_months: usize,
    pub average_monthly_revenue: f64,
    pub median_monthly_revenue: f64,
    pub min_revenue: f64,
    pub max_revenue: f64,
    pub average_mom_growth_pct: f64,
    pub growth_volatility_pct: f64,
    pub recent_trend: TrendDirection,
    pub mom_growth_rates: Vec<f64>,
}

/// Which forecasting model produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "SES")]
    Ses,
    #[serde(rename = "SARIMAX")]
    Sarimax,
}

impl ModelKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::Ses => "SES",
            ModelKind::Sarimax => "SARIMAX",
        }
    }
}

/// One forecast month with its 80% confidence bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub revenue: f64,
    pub conf_lower: f64,
    pub conf_upper: f64,
}

/// Full forecast output: chosen model, fitted sample size, and exactly
/// three sequential future months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub model_used: ModelKind,
    pub data_points: usize,
    pub forecast: Vec<ForecastPoint>,
}

/// Configuration for one `revcast analyze` run.
///
/// Constructed by the CLI and passed down; the core takes no process-wide
/// state and owns nothing beyond this value.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub csv_path: PathBuf,
    pub emit_json: bool,
    pub export: Option<PathBuf>,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_dates_as_iso_and_omits_missing_expenses() {
        let record = CanonicalRecord {
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            revenue: 1200.5,
            expenses: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], "2023-01-01");
        assert!(json.get("expenses").is_none());

        let with_expenses = CanonicalRecord {
            expenses: Some(300.0),
            ..record
        };
        let json = serde_json::to_value(&with_expenses).unwrap();
        assert_eq!(json["expenses"], 300.0);
    }

    #[test]
    fn trend_labels_match_display() {
        let json = serde_json::to_value(TrendDirection::InsufficientData).unwrap();
        assert_eq!(json, "insufficient data");
        assert_eq!(TrendDirection::Upward.to_string(), "upward");
    }

    #[test]
    fn model_kind_serializes_as_upper_case_names() {
        assert_eq!(serde_json::to_value(ModelKind::Ses).unwrap(), "SES");
        assert_eq!(serde_json::to_value(ModelKind::Sarimax).unwrap(), "SARIMAX");
        assert_eq!(ModelKind::Sarimax.display_name(), "SARIMAX");
    }
}
