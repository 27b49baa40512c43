//! Historical performance metrics over a cleaned series.
//!
//! Computes descriptive revenue statistics, the month-over-month growth
//! series, and a coarse recent-trend label. The input is consumed read-only;
//! nothing here mutates or re-validates the cleaned series.

use crate::domain::{CanonicalRecord, MetricsSummary, TrendDirection};
use crate::math::{mean, median, population_std, round2};

/// Observations needed before a trend direction is reported.
const TREND_WINDOW: usize = 3;

/// Compute the metrics summary.
///
/// Meaningful output needs at least 2 observations; fewer yields zeroed
/// growth figures and an `insufficient data` trend rather than an error.
pub fn compute_metrics(series: &[CanonicalRecord]) -> MetricsSummary {
    let revenues: Vec<f64> = series.iter().map(|r| r.revenue).collect();

    let growth = mom_growth(&revenues);
    let average_growth = if growth.is_empty() {
        0.0
    } else {
        round2(mean(&growth))
    };
    let volatility = if growth.is_empty() {
        0.0
    } else {
        round2(population_std(&growth))
    };

    let min_revenue = revenues.iter().copied().fold(f64::INFINITY, f64::min);
    let max_revenue = revenues.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    MetricsSummary {
        date_range: date_range_label(series),
        total_months: series.len(),
        average_monthly_revenue: round2(mean(&revenues)),
        median_monthly_revenue: round2(median(&revenues)),
        min_revenue: if revenues.is_empty() {
            0.0
        } else {
            round2(min_revenue)
        },
        max_revenue: if revenues.is_empty() {
            0.0
        } else {
            round2(max_revenue)
        },
        average_mom_growth_pct: average_growth,
        growth_volatility_pct: volatility,
        recent_trend: trend_direction(&revenues),
        mom_growth_rates: growth,
    }
}

/// Month-over-month growth percentages, rounded to 2 decimals.
///
/// Pairs whose previous revenue is zero are skipped entirely (no entry, not
/// a zero), so the output may be shorter than `len - 1`.
pub fn mom_growth(revenues: &[f64]) -> Vec<f64> {
    let mut growth = Vec::new();
    for pair in revenues.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        if prev != 0.0 {
            growth.push(round2((cur - prev) / prev * 100.0));
        }
    }
    growth
}

/// Trend over the trailing three observations, endpoints only.
///
/// The middle value is ignored: a series ending `[100, 300, 101]` still
/// reads as upward. Coarse, but stable against single-month spikes.
pub fn trend_direction(revenues: &[f64]) -> TrendDirection {
    if revenues.len() < TREND_WINDOW {
        return TrendDirection::InsufficientData;
    }
    let first = revenues[revenues.len() - TREND_WINDOW];
    let last = revenues[revenues.len() - 1];
    if last > first {
        TrendDirection::Upward
    } else if last < first {
        TrendDirection::Downward
    } else {
        TrendDirection::Flat
    }
}

/// Human-readable `"Mon YYYY to Mon YYYY"` label from first/last dates.
fn date_range_label(series: &[CanonicalRecord]) -> String {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) => format!(
            "{} to {}",
            first.date.format("%b %Y"),
            last.date.format("%b %Y")
        ),
        _ => String::new(),
    }
}
