//! Formatted run summaries for the terminal.

use crate::app::pipeline::AnalysisOutput;
use crate::domain::{ForecastResult, MetricsSummary};

/// Format the full run summary (dataset, metrics, trend, forecast table).
pub fn format_analysis_summary(output: &AnalysisOutput) -> String {
    let metrics = &output.metrics;
    let forecast = &output.forecast;
    let mut out = String::new();

    out.push_str("=== revcast - Monthly Revenue Analysis ===\n");
    out.push_str(&format!(
        "Period: {} ({} months)\n\n",
        metrics.date_range, metrics.total_months
    ));

    out.push_str("Revenue\n");
    out.push_str(&format!(
        "  average {}   median {}\n",
        format_usd(metrics.average_monthly_revenue),
        format_usd(metrics.median_monthly_revenue)
    ));
    out.push_str(&format!(
        "  range   {} .. {}\n\n",
        format_usd(metrics.min_revenue),
        format_usd(metrics.max_revenue)
    ));

    out.push_str("Growth\n");
    out.push_str(&format!(
        "  average MoM {:.2}%   volatility {:.2}%\n",
        metrics.average_mom_growth_pct, metrics.growth_volatility_pct
    ));
    out.push_str(&format!("  recent trend: {}\n\n", metrics.recent_trend));

    out.push_str(&format!(
        "Forecast ({}, fitted on {} points)\n",
        forecast.model_used.display_name(),
        forecast.data_points
    ));
    for point in &forecast.forecast {
        out.push_str(&format!(
            "  {}  {}  (80% CI {} .. {})\n",
            point.date.format("%Y-%m-%d"),
            format_usd(point.revenue),
            format_usd(point.conf_lower),
            format_usd(point.conf_upper)
        ));
    }

    out.push('\n');
    out.push_str(&summary_text(metrics));
    out.push('\n');

    out
}

/// One-paragraph prose rendering of the metrics, for quick reading and for
/// collaborators that consume text rather than JSON.
pub fn summary_text(metrics: &MetricsSummary) -> String {
    format!(
        "Data covers {} ({} months). Average monthly revenue is {}. \
         Median monthly revenue is {}. Revenue ranged from {} to {}. \
         Average MoM growth rate is {}% with volatility of {}%. \
         Recent trend is {}.",
        metrics.date_range,
        metrics.total_months,
        format_usd_whole(metrics.average_monthly_revenue),
        format_usd_whole(metrics.median_monthly_revenue),
        format_usd_whole(metrics.min_revenue),
        format_usd_whole(metrics.max_revenue),
        metrics.average_mom_growth_pct,
        metrics.growth_volatility_pct,
        metrics.recent_trend
    )
}

/// Compact forecast line for scripting surfaces.
pub fn format_forecast_line(forecast: &ForecastResult) -> String {
    let points: Vec<String> = forecast
        .forecast
        .iter()
        .map(|p| format!("{}={}", p.date.format("%Y-%m"), format_usd(p.revenue)))
        .collect();
    format!(
        "{} ({} points): {}",
        forecast.model_used.display_name(),
        forecast.data_points,
        points.join(", ")
    )
}

/// `$1,234.56` rendering with thousands separators.
pub fn format_usd(value: f64) -> String {
    format_usd_with_decimals(value, 2)
}

/// `$1,234` rendering used inside prose.
pub fn format_usd_whole(value: f64) -> String {
    format_usd_with_decimals(value, 0)
}

fn format_usd_with_decimals(value: f64, decimals: usize) -> String {
    let negative = value < 0.0;
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (pos, ch) in digits.iter().enumerate() {
        if pos > 0 && (digits.len() - pos) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{sign}${grouped}.{frac}"),
        None => format!("{sign}${grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TrendDirection;

    fn metrics() -> MetricsSummary {
        MetricsSummary {
            date_range: "Jan 2023 to Aug 2023".to_string(),
            total_months: 8,
            average_monthly_revenue: 8243.21,
            median_monthly_revenue: 8100.0,
            min_revenue: 7100.5,
            max_revenue: 9900.0,
            average_mom_growth_pct: 2.15,
            growth_volatility_pct: 4.6,
            recent_trend: TrendDirection::Upward,
            mom_growth_rates: vec![2.0, 2.3],
        }
    }

    #[test]
    fn usd_formatting_groups_thousands() {
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(999.0), "$999.00");
        assert_eq!(format_usd_whole(8243.21), "$8,243");
        assert_eq!(format_usd(-1234.5), "-$1,234.50");
        assert_eq!(format_usd(0.0), "$0.00");
    }

    #[test]
    fn summary_text_reads_like_the_report() {
        let text = summary_text(&metrics());
        assert!(text.contains("Data covers Jan 2023 to Aug 2023 (8 months)."));
        assert!(text.contains("Average monthly revenue is $8,243."));
        assert!(text.contains("Recent trend is upward."));
    }
}
