//! Cleaning: raw table rows into a validated monthly series.
//!
//! Steps, in order:
//!
//! 1. parse the date cell permissively (failures stay in the row for now)
//! 2. coerce revenue/expenses to numbers (failures become nulls, not errors)
//! 3. stable-sort ascending by date, rows without a parsed date last
//! 4. linearly interpolate interior revenue nulls from their nearest known
//!    neighbors in sequence position; boundary nulls stay null
//! 5. drop rows still missing a date or revenue
//! 6. require at least `MIN_CLEANED_ROWS` survivors
//!
//! Rows with unparseable dates are kept through interpolation (their revenue
//! can anchor a neighbor's fill) and only dropped at the final filter.

pub mod dates;

pub use dates::parse_date_permissive;

use chrono::NaiveDate;

use crate::domain::CanonicalRecord;
use crate::error::PipelineError;
use crate::io::columns::ResolvedColumns;
use crate::io::ingest::{RawTable, cell};

/// Hard floor on surviving rows after cleaning.
pub const MIN_CLEANED_ROWS: usize = 6;

#[derive(Debug, Clone)]
struct WorkingRow {
    date: Option<NaiveDate>,
    revenue: Option<f64>,
    expenses: Option<f64>,
}

/// Clean a raw table using previously resolved columns.
pub fn clean_table(
    table: &RawTable,
    columns: &ResolvedColumns,
) -> Result<Vec<CanonicalRecord>, PipelineError> {
    let date_idx = required_index(table, &columns.date)?;
    let revenue_idx = required_index(table, &columns.revenue)?;
    let expenses_idx = columns
        .expenses
        .as_deref()
        .and_then(|name| table.column_index(name));

    let mut rows: Vec<WorkingRow> = table
        .rows
        .iter()
        .map(|row| WorkingRow {
            date: cell(row, date_idx).and_then(parse_date_permissive),
            revenue: cell(row, revenue_idx).and_then(parse_cell_f64),
            expenses: expenses_idx
                .and_then(|idx| cell(row, idx))
                .and_then(parse_cell_f64),
        })
        .collect();

    rows.sort_by(|a, b| match (a.date, b.date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    interpolate_revenue(&mut rows);

    let cleaned: Vec<CanonicalRecord> = rows
        .into_iter()
        .filter_map(|row| match (row.date, row.revenue) {
            (Some(date), Some(revenue)) => Some(CanonicalRecord {
                date,
                revenue,
                expenses: row.expenses,
            }),
            _ => None,
        })
        .collect();

    if cleaned.len() < MIN_CLEANED_ROWS {
        return Err(PipelineError::InsufficientData {
            observed: cleaned.len(),
            required: MIN_CLEANED_ROWS,
        });
    }

    Ok(cleaned)
}

fn required_index(table: &RawTable, header: &str) -> Result<usize, PipelineError> {
    table
        .column_index(header)
        .ok_or_else(|| PipelineError::ColumnResolution {
            found: table.headers.clone(),
            missing: vec![header.to_string()],
        })
}

/// Fill interior revenue nulls linearly between their nearest known
/// neighbors; runs touching either end of the sequence stay null.
fn interpolate_revenue(rows: &mut [WorkingRow]) {
    let known: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.revenue.is_some())
        .map(|(idx, _)| idx)
        .collect();

    for pair in known.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if hi - lo < 2 {
            continue;
        }
        let (Some(a), Some(b)) = (rows[lo].revenue, rows[hi].revenue) else {
            continue;
        };
        let span = (hi - lo) as f64;
        for idx in lo + 1..hi {
            let fraction = (idx - lo) as f64 / span;
            rows[idx].revenue = Some(a + (b - a) * fraction);
        }
    }
}

/// Numeric coercion for a raw cell: finite floats only, everything else null.
fn parse_cell_f64(value: &str) -> Option<f64> {
    let parsed = value.trim().parse::<f64>().ok()?;
    if parsed.is_finite() { Some(parsed) } else { None }
}
