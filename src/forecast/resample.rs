//! Monthly calendar alignment.
//!
//! Model fitting wants one observation per calendar month, dated at the
//! month start. Irregular exports (mid-month dates, duplicate months) are
//! collapsed by keeping the **last** observation within each month, in the
//! already-sorted input order.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

/// Collapse a date-sorted series onto month-start dates.
///
/// Already-aligned input (unique months, day 1) passes through unchanged.
pub fn resample_monthly(series: &[(NaiveDate, f64)]) -> Vec<(NaiveDate, f64)> {
    let mut by_month: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for &(date, revenue) in series {
        if let Some(month_start) = NaiveDate::from_ymd_opt(date.year(), date.month(), 1) {
            by_month.insert(month_start, revenue);
        }
    }
    by_month.into_iter().collect()
}
