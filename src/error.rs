//! Pipeline error type.
//!
//! Every stage fails with its own specific kind and payload; nothing is
//! downgraded to a generic failure, and the core never retries. The binary
//! maps each kind to a stable process exit code:
//!
//! - `2` — input/schema problems (unresolvable columns, malformed payloads, file I/O)
//! - `3` — data problems (too few rows, unparseable dates)

use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Required columns could not be resolved among the discovered headers.
    ColumnResolution {
        found: Vec<String>,
        missing: Vec<String>,
    },
    /// Row count fell below a stage-specific floor.
    InsufficientData { observed: usize, required: usize },
    /// Input is not a non-empty list of record-like objects, even after the
    /// liberal unwrapping attempts.
    MalformedInput { detail: String },
    /// Date values could not be parsed under the permissive mixed-format rules.
    DateParse { samples: Vec<String> },
    /// Boundary file I/O failure (CSV/JSON reads and writes).
    Io { detail: String },
}

impl PipelineError {
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::ColumnResolution { .. } => 2,
            PipelineError::MalformedInput { .. } => 2,
            PipelineError::Io { .. } => 2,
            PipelineError::InsufficientData { .. } => 3,
            PipelineError::DateParse { .. } => 3,
        }
    }

    /// Structured failure object for the JSON transport boundary.
    pub fn to_report(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::ColumnResolution { found, missing } => write!(
                f,
                "Could not find required columns. Found: [{}]. Need columns matching: {}.",
                found.join(", "),
                missing.join(", ")
            ),
            PipelineError::InsufficientData { observed, required } => write!(
                f,
                "Insufficient data. Need at least {required} rows, got {observed}."
            ),
            PipelineError::MalformedInput { detail } => {
                write!(f, "Malformed series input: {detail}")
            }
            PipelineError::DateParse { samples } => write!(
                f,
                "Could not parse dates. Sample values: [{}]",
                samples.join(", ")
            ),
            PipelineError::Io { detail } => write!(f, "{detail}"),
        }
    }
}

impl std::error::Error for PipelineError {}
