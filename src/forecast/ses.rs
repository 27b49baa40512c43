//! Simple Exponential Smoothing.
//!
//! The short-history model: a single smoothing parameter, a flat forecast at
//! the final level, and a symmetric band from the sample standard deviation
//! of the observations.
//!
//! The smoothing parameter is chosen by grid search over α ∈ {0.01..0.99},
//! minimizing one-step-ahead squared error. Candidates are independent, so
//! they evaluate in parallel; selection is deterministic (lowest SSE, ties
//! broken by the smaller α).

use rayon::prelude::*;

use super::ForecastBands;
use crate::math::sample_std;

/// Multiplier for the ~80% band: mean ± 1.28 σ.
const BAND_Z: f64 = 1.28;

/// Fit the smoothing parameter and produce a flat `horizon`-step forecast.
pub fn fit_and_forecast(series: &[f64], horizon: usize) -> ForecastBands {
    let alpha = best_alpha(series);
    let level = smoothed_level(series, alpha);
    let band = BAND_Z * sample_std(series);

    let mean = vec![level; horizon];
    let lower = mean.iter().map(|v| v - band).collect();
    let upper = mean.iter().map(|v| v + band).collect();

    ForecastBands { mean, lower, upper }
}

/// Grid-search α by one-step-ahead SSE.
fn best_alpha(series: &[f64]) -> f64 {
    let best = (1u32..100)
        .into_par_iter()
        .map(|step| (step, one_step_sse(series, step as f64 / 100.0)))
        .min_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

    match best {
        Some((step, _)) => step as f64 / 100.0,
        None => 0.5,
    }
}

/// Sum of squared one-step-ahead errors for a candidate α.
fn one_step_sse(series: &[f64], alpha: f64) -> f64 {
    let mut level = series[0];
    let mut sse = 0.0;
    for &value in &series[1..] {
        let error = value - level;
        sse += error * error;
        level = alpha * value + (1.0 - alpha) * level;
    }
    sse
}

/// Final smoothed level after running the recursion over the series.
fn smoothed_level(series: &[f64], alpha: f64) -> f64 {
    let mut level = series[0];
    for &value in &series[1..] {
        level = alpha * value + (1.0 - alpha) * level;
    }
    level
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERIES: [f64; 8] = [120.0, 132.0, 101.0, 134.0, 190.0, 150.0, 170.0, 180.0];

    #[test]
    fn forecast_is_flat_at_the_fitted_level() {
        let bands = fit_and_forecast(&SERIES, 3);
        assert_eq!(bands.mean.len(), 3);
        assert_eq!(bands.mean[0], bands.mean[1]);
        assert_eq!(bands.mean[1], bands.mean[2]);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let first = fit_and_forecast(&SERIES, 3);
        let second = fit_and_forecast(&SERIES, 3);
        assert_eq!(first.mean, second.mean);
        assert_eq!(first.lower, second.lower);
        assert_eq!(first.upper, second.upper);
    }

    #[test]
    fn band_is_symmetric_at_1_28_sample_std() {
        let bands = fit_and_forecast(&SERIES, 3);
        let expected = 1.28 * sample_std(&SERIES);
        for i in 0..3 {
            assert!((bands.mean[i] - bands.lower[i] - expected).abs() < 1e-9);
            assert!((bands.upper[i] - bands.mean[i] - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn constant_series_forecasts_itself_with_zero_width_band() {
        let series = [42.0; 6];
        let bands = fit_and_forecast(&series, 3);
        assert_eq!(bands.mean, vec![42.0, 42.0, 42.0]);
        assert_eq!(bands.lower, bands.mean);
        assert_eq!(bands.upper, bands.mean);
    }

    #[test]
    fn responsive_alpha_tracks_a_step_change() {
        // A series that jumps and stays jumped: the fitted level should land
        // near the new plateau, not the old one.
        let series = [10.0, 10.0, 10.0, 10.0, 100.0, 100.0, 100.0, 100.0];
        let bands = fit_and_forecast(&series, 1);
        assert!(bands.mean[0] > 55.0, "level {} too low", bands.mean[0]);
    }
}
