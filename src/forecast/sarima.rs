//! Seasonal ARIMA-family model, order (1,1,1) with seasonal order (1,1,1,12).
//!
//! Estimation is conditional least squares in two stages:
//!
//! 1. difference the series (regular lag 1, plus seasonal lag 12 when the
//!    doubly-differenced series would keep enough points), then estimate the
//!    AR terms by regressing on the lagged differenced values
//! 2. estimate the MA terms from the autocorrelation of the stage-1 residuals
//!
//! On series too short to identify a term, that term is pinned to zero
//! instead of failing — the fit degrades, the forecast still comes out.
//! Coefficients are clamped inside the unit interval; neither stationarity
//! nor invertibility is enforced beyond that.
//!
//! The 80% interval accumulates residual variance through the ψ-weights of
//! the integrated process. Seasonal terms first contribute at lag 12, so
//! they do not widen a 3-step horizon.

use nalgebra::{DMatrix, DVector};

use super::ForecastBands;
use crate::math::solve_least_squares;

/// Seasonal period: monthly data, yearly cycle.
const SEASON: usize = 12;

/// Normal quantile for the 80% interval (α = 0.20).
const Z_80: f64 = 1.2816;

/// Keep coefficients strictly inside the unit interval.
const COEFF_LIMIT: f64 = 0.99;

/// Minimum doubly-differenced length worth estimating on; below this the
/// seasonal differencing is skipped (regular differencing only).
const MIN_DOUBLE_DIFF: usize = 5;

struct FittedModel {
    phi: f64,
    seasonal_phi: f64,
    theta: f64,
    seasonal_theta: f64,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    sigma: f64,
    seasonal_diff: bool,
}

/// Fit the model and forecast `horizon` steps with its native 80% band.
pub fn fit_and_forecast(series: &[f64], horizon: usize) -> ForecastBands {
    let model = fit(series);
    let deltas = forecast_differenced(&model, horizon);
    let mean = integrate(series, &deltas, model.seasonal_diff);

    let mut lower = Vec::with_capacity(horizon);
    let mut upper = Vec::with_capacity(horizon);
    let mut psi_cum = 1.0;
    let mut var_factor = 0.0;
    for (h, &point) in mean.iter().enumerate() {
        if h > 0 {
            let psi = model.phi.powi(h as i32 - 1) * (model.phi + model.theta);
            psi_cum += psi;
        }
        var_factor += psi_cum * psi_cum;
        let half_width = Z_80 * model.sigma * var_factor.sqrt();
        lower.push(point - half_width);
        upper.push(point + half_width);
    }

    ForecastBands { mean, lower, upper }
}

fn fit(series: &[f64]) -> FittedModel {
    let n = series.len();
    let seasonal_diff = n >= SEASON + 1 + MIN_DOUBLE_DIFF;

    let w: Vec<f64> = if seasonal_diff {
        (SEASON + 1..n)
            .map(|t| series[t] - series[t - 1] - series[t - SEASON] + series[t - SEASON - 1])
            .collect()
    } else {
        (1..n).map(|t| series[t] - series[t - 1]).collect()
    };

    let (phi, seasonal_phi) = estimate_ar(&w);
    let residuals = ar_residuals(&w, phi, seasonal_phi);
    let (theta, seasonal_theta) = estimate_ma(&residuals);

    let sigma = if residuals.is_empty() {
        0.0
    } else {
        (residuals.iter().map(|e| e * e).sum::<f64>() / residuals.len() as f64).sqrt()
    };

    FittedModel {
        phi,
        seasonal_phi,
        theta,
        seasonal_theta,
        differenced: w,
        residuals,
        sigma,
        seasonal_diff,
    }
}

/// AR terms by least squares on lagged values.
///
/// The seasonal lag needs rows at distance 12; with fewer than 3 such rows
/// only the regular lag is fit, and with almost nothing both terms are 0.
fn estimate_ar(w: &[f64]) -> (f64, f64) {
    let m = w.len();

    if m >= SEASON + 3 {
        let rows = m - SEASON;
        let x = DMatrix::from_fn(rows, 2, |r, c| {
            let t = SEASON + r;
            if c == 0 { w[t - 1] } else { w[t - SEASON] }
        });
        let y = DVector::from_fn(rows, |r, _| w[SEASON + r]);
        if let Some(beta) = solve_least_squares(&x, &y) {
            return (clamp_coeff(beta[0]), clamp_coeff(beta[1]));
        }
    }

    if m >= 4 {
        let rows = m - 1;
        let x = DMatrix::from_fn(rows, 1, |r, _| w[r]);
        let y = DVector::from_fn(rows, |r, _| w[r + 1]);
        if let Some(beta) = solve_least_squares(&x, &y) {
            return (clamp_coeff(beta[0]), 0.0);
        }
    }

    (0.0, 0.0)
}

/// One-step residuals of the AR stage; unavailable lags contribute zero.
fn ar_residuals(w: &[f64], phi: f64, seasonal_phi: f64) -> Vec<f64> {
    (0..w.len())
        .map(|t| {
            let predicted = phi * lag(w, t, 1) + seasonal_phi * lag(w, t, SEASON)
                - phi * seasonal_phi * lag(w, t, SEASON + 1);
            w[t] - predicted
        })
        .collect()
}

/// MA terms from residual autocorrelation (clamped for stability).
fn estimate_ma(residuals: &[f64]) -> (f64, f64) {
    let theta = clamp_coeff(lag_autocorrelation(residuals, 1));
    let seasonal_theta = if residuals.len() > SEASON + 2 {
        clamp_coeff(lag_autocorrelation(residuals, SEASON))
    } else {
        0.0
    };
    (theta, seasonal_theta)
}

fn lag_autocorrelation(values: &[f64], k: usize) -> f64 {
    let n = values.len();
    if n <= k {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
    if variance < 1e-12 {
        return 0.0;
    }
    let covariance = (k..n)
        .map(|i| (values[i] - mean) * (values[i - k] - mean))
        .sum::<f64>()
        / n as f64;
    covariance / variance
}

fn clamp_coeff(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-COEFF_LIMIT, COEFF_LIMIT)
    } else {
        0.0
    }
}

fn lag(values: &[f64], idx: usize, k: usize) -> f64 {
    if idx >= k { values[idx - k] } else { 0.0 }
}

/// Recurse the fitted model forward on the differenced scale.
///
/// Future shocks are zero; the lag-1 residual feeds the first step's MA
/// term, the seasonal residual feeds any step within a season of the data.
fn forecast_differenced(model: &FittedModel, horizon: usize) -> Vec<f64> {
    let mut w_ext = model.differenced.clone();
    let mut e_ext = model.residuals.clone();
    let mut values = Vec::with_capacity(horizon);

    for _ in 0..horizon {
        let idx = w_ext.len();
        let mut next = model.phi * lag(&w_ext, idx, 1)
            + model.seasonal_phi * lag(&w_ext, idx, SEASON)
            - model.phi * model.seasonal_phi * lag(&w_ext, idx, SEASON + 1);
        next +=
            model.theta * lag(&e_ext, idx, 1) + model.seasonal_theta * lag(&e_ext, idx, SEASON);
        w_ext.push(next);
        e_ext.push(0.0);
        values.push(next);
    }
    values
}

/// Undo the differencing: each forecast delta stacks on the running series.
fn integrate(series: &[f64], deltas: &[f64], seasonal_diff: bool) -> Vec<f64> {
    let mut extended = series.to_vec();
    let mut out = Vec::with_capacity(deltas.len());
    for &delta in deltas {
        let j = extended.len();
        let value = if seasonal_diff {
            delta + extended[j - 1] + extended[j - SEASON] - extended[j - SEASON - 1]
        } else {
            delta + extended[j - 1]
        };
        extended.push(value);
        out.push(value);
    }
    out
}
