//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed revenue: `o`
//! - forecast mean: `*`
//! - forecast 80% band edges: `.`

use crate::domain::{CanonicalRecord, ForecastPoint};

const MARGIN: usize = 11;

/// Render observed history and the forecast into a fixed character grid.
pub fn render_revenue_chart(
    history: &[CanonicalRecord],
    forecast: &[ForecastPoint],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(20);
    let height = height.max(5);

    let total = history.len() + forecast.len();
    if total < 2 {
        return String::new();
    }

    let mut values: Vec<f64> = history.iter().map(|r| r.revenue).collect();
    for point in forecast {
        values.push(point.revenue);
        values.push(point.conf_lower);
        values.push(point.conf_upper);
    }
    let (y_min, y_max) = padded_range(&values);

    let mut grid = vec![vec![' '; width]; height];

    // Band edges first so the mean and observations overlay them.
    for (offset, point) in forecast.iter().enumerate() {
        let col = column(history.len() + offset, total, width);
        plot_cell(&mut grid, col, point.conf_lower, y_min, y_max, '.');
        plot_cell(&mut grid, col, point.conf_upper, y_min, y_max, '.');
    }
    for (offset, point) in forecast.iter().enumerate() {
        let col = column(history.len() + offset, total, width);
        plot_cell(&mut grid, col, point.revenue, y_min, y_max, '*');
    }
    for (idx, record) in history.iter().enumerate() {
        let col = column(idx, total, width);
        plot_cell(&mut grid, col, record.revenue, y_min, y_max, 'o');
    }

    let mut out = String::new();
    for (row, line) in grid.iter().enumerate() {
        let label = if row == 0 {
            format!("{:>width$.0}", y_max, width = MARGIN - 1)
        } else if row == height - 1 {
            format!("{:>width$.0}", y_min, width = MARGIN - 1)
        } else {
            " ".repeat(MARGIN - 1)
        };
        out.push_str(&label);
        out.push('|');
        out.extend(line.iter());
        out.push('\n');
    }

    out.push_str(&" ".repeat(MARGIN - 1));
    out.push('+');
    out.push_str(&"-".repeat(width));
    out.push('\n');

    if let (Some(first), Some(last)) = (first_date(history, forecast), last_date(history, forecast))
    {
        let left = first.format("%b %Y").to_string();
        let right = last.format("%b %Y").to_string();
        let gap = (width + 1).saturating_sub(left.len() + right.len());
        out.push_str(&" ".repeat(MARGIN - 1));
        out.push_str(&left);
        out.push_str(&" ".repeat(gap));
        out.push_str(&right);
        out.push('\n');
    }

    out.push_str(&" ".repeat(MARGIN - 1));
    out.push_str("o observed   * forecast   . 80% band\n");
    out
}

fn first_date(
    history: &[CanonicalRecord],
    forecast: &[ForecastPoint],
) -> Option<chrono::NaiveDate> {
    history
        .first()
        .map(|r| r.date)
        .or_else(|| forecast.first().map(|p| p.date))
}

fn last_date(
    history: &[CanonicalRecord],
    forecast: &[ForecastPoint],
) -> Option<chrono::NaiveDate> {
    forecast
        .last()
        .map(|p| p.date)
        .or_else(|| history.last().map(|r| r.date))
}

fn padded_range(values: &[f64]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < 1e-9 {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn column(index: usize, total: usize, width: usize) -> usize {
    if total <= 1 {
        return 0;
    }
    index * (width - 1) / (total - 1)
}

fn plot_cell(grid: &mut [Vec<char>], col: usize, value: f64, y_min: f64, y_max: f64, mark: char) {
    if !value.is_finite() || y_max <= y_min {
        return;
    }
    let height = grid.len();
    let fraction = ((value - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    let row = height - 1 - ((fraction * (height - 1) as f64).round() as usize).min(height - 1);
    if let Some(line) = grid.get_mut(row) {
        if let Some(cell) = line.get_mut(col) {
            *cell = mark;
        }
    }
}
