//! Shared analysis pipeline used by the CLI front-end and exposed to
//! orchestration callers.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV read -> column resolution -> cleaning -> metrics -> forecast
//!
//! Data flows strictly forward; no stage mutates another's output. The
//! forecast stage consumes the cleaned series through the same JSON record
//! form an external collaborator would send, so both entry paths exercise
//! identical code.

use serde::Serialize;

use crate::clean::clean_table;
use crate::domain::{AnalysisConfig, CanonicalRecord, ForecastResult, MetricsSummary};
use crate::error::PipelineError;
use crate::io::columns::resolve_columns;
use crate::io::ingest::{RawTable, read_raw_table};
use crate::io::transport::records_from_cleaned;

pub use crate::forecast::{forecast_records, forecast_series};
pub use crate::metrics::compute_metrics;

/// All computed outputs of a single `revcast analyze` run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutput {
    pub cleaned_data: Vec<CanonicalRecord>,
    pub metrics: MetricsSummary,
    pub forecast: ForecastResult,
}

/// Resolve columns on a raw table and clean it into a validated series.
pub fn resolve_and_clean(table: &RawTable) -> Result<Vec<CanonicalRecord>, PipelineError> {
    let columns = resolve_columns(&table.headers)?;
    clean_table(table, &columns)
}

/// Execute the full analysis pipeline for one CSV file.
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisOutput, PipelineError> {
    let table = read_raw_table(&config.csv_path)?;
    let cleaned_data = resolve_and_clean(&table)?;
    let metrics = compute_metrics(&cleaned_data);
    let forecast = forecast_records(&records_from_cleaned(&cleaned_data))?;

    Ok(AnalysisOutput {
        cleaned_data,
        metrics,
        forecast,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelKind, TrendDirection};
    use crate::io::ingest::raw_table_from_reader;

    fn table_from(csv: &str) -> RawTable {
        raw_table_from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn full_pipeline_over_a_messy_csv() {
        let csv = "Txn Date,Rev (USD)\n\
                   2023-01-01,1000\n\
                   02/01/2023,1100\n\
                   2023-03-01,\n\
                   2023-04-01,1300\n\
                   2023-05-01,1250\n\
                   2023-06-01,1400\n\
                   2023-07-01,1500\n";
        let table = table_from(csv);
        let cleaned = resolve_and_clean(&table).unwrap();
        assert_eq!(cleaned.len(), 7);
        // Interpolated March sits between February and April.
        assert_eq!(cleaned[2].revenue, 1200.0);

        let metrics = compute_metrics(&cleaned);
        assert_eq!(metrics.total_months, 7);
        assert_eq!(metrics.date_range, "Jan 2023 to Jul 2023");
        assert_eq!(metrics.recent_trend, TrendDirection::Upward);

        let forecast = forecast_records(&records_from_cleaned(&cleaned)).unwrap();
        assert_eq!(forecast.model_used, ModelKind::Ses);
        assert_eq!(forecast.forecast.len(), 3);
        assert_eq!(
            forecast.forecast[0].date.format("%Y-%m-%d").to_string(),
            "2023-08-01"
        );
    }

    #[test]
    fn resolution_failure_surfaces_before_cleaning() {
        let table = table_from("A,B\n1,2\n3,4\n");
        let err = resolve_and_clean(&table).unwrap_err();
        assert!(matches!(err, PipelineError::ColumnResolution { .. }));
    }
}
