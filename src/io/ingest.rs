//! CSV ingest.
//!
//! This stage only reads bytes into an ordered table of strings. Headers are
//! arbitrary and untrusted; everything semantic (column resolution, type
//! coercion, validation) happens downstream so that each stage can fail with
//! its own specific error.

use std::fs::File;
use std::path::Path;

use crate::error::PipelineError;

/// Raw CSV contents: ordered headers plus ordered rows of raw cells.
///
/// Rows may be shorter than the header list (the reader is flexible);
/// missing cells read back as empty.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Position of an exact header, if present.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }
}

/// Cell at a header position; empty/missing cells yield `None`.
pub fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Read a CSV file into a `RawTable`.
pub fn read_raw_table(path: &Path) -> Result<RawTable, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::Io {
        detail: format!("Failed to open CSV '{}': {e}", path.display()),
    })?;
    raw_table_from_reader(file)
}

/// Read CSV bytes from any reader into a `RawTable`.
pub fn raw_table_from_reader<R: std::io::Read>(reader: R) -> Result<RawTable, PipelineError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| PipelineError::Io {
            detail: format!("Failed to read CSV headers: {e}"),
        })?
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix
            // on the first header. If we don't strip it, resolution would see a
            // phantom character and misscore the column.
            if idx == 0 {
                name.trim_start_matches('\u{feff}').to_string()
            } else {
                name.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| PipelineError::Io {
            detail: format!("CSV parse error: {e}"),
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}
