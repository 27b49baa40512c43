//! Fuzzy header resolution.
//!
//! Real-world exports rarely name their columns `date` and `revenue`; we see
//! `Txn Date`, `Rev (USD)`, `Monthly Sales`, and worse. This module maps raw
//! headers onto the canonical fields by sequence similarity rather than by
//! exact name.
//!
//! Resolution rules:
//! - headers are normalized (lowercased, trimmed, punctuation/whitespace
//!   stripped) before scoring
//! - the highest-scoring header wins if it reaches the 0.6 threshold; ties
//!   keep the earliest header in file order
//! - the date field retries a fixed list of alternate names when `date`
//!   itself finds nothing
//! - expenses are optional; date and revenue are required, and failing
//!   either reports *all* unmet targets at once (never partial success)

use crate::error::PipelineError;
use crate::math::sequence_ratio;

/// Minimum similarity for a header to count as a match.
pub const MATCH_THRESHOLD: f64 = 0.6;

/// Alternate names tried, in order, when no header matches `date`.
const DATE_ALTERNATES: [&str; 4] = ["month", "period", "time", "year"];

/// Targets tried, in order, for the optional expenses column.
const EXPENSE_TARGETS: [&str; 2] = ["expenses", "expense"];

/// The raw header strings chosen for each canonical field.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumns {
    pub date: String,
    pub revenue: String,
    pub expenses: Option<String>,
}

/// Resolve the date/revenue (and optionally expenses) columns.
pub fn resolve_columns(headers: &[String]) -> Result<ResolvedColumns, PipelineError> {
    let date = best_match(headers, "date").or_else(|| {
        DATE_ALTERNATES
            .iter()
            .find_map(|&alt| best_match(headers, alt))
    });
    let revenue = best_match(headers, "revenue");
    let expenses = EXPENSE_TARGETS
        .iter()
        .find_map(|&target| best_match(headers, target));

    let mut missing = Vec::new();
    if date.is_none() {
        missing.push("date".to_string());
    }
    if revenue.is_none() {
        missing.push("revenue".to_string());
    }
    if !missing.is_empty() {
        return Err(PipelineError::ColumnResolution {
            found: headers.to_vec(),
            missing,
        });
    }

    Ok(ResolvedColumns {
        date: date.unwrap(),
        revenue: revenue.unwrap(),
        expenses,
    })
}

/// Best-scoring header for a target name, if any reaches the threshold.
fn best_match(headers: &[String], target: &str) -> Option<String> {
    let mut best: Option<(&String, f64)> = None;
    for header in headers {
        let score = sequence_ratio(&normalize_header(header), target);
        if score < MATCH_THRESHOLD {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((header, score)),
        }
    }
    best.map(|(header, _)| header.clone())
}

/// Lowercase and keep only alphanumeric characters.
///
/// Stripping punctuation and whitespace lets decorated headers like
/// `Rev (USD)` still clear the threshold against `revenue`.
fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
