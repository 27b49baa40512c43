//! Liberal JSON transport parsing.
//!
//! The forecaster's upstream collaborator generates text, so the payload it
//! hands us is only *usually* a clean JSON array. This module implements the
//! tolerant acceptance chain as an explicit priority order:
//!
//! 1. direct JSON parse
//! 2. extraction of the first embedded `[...]` (then `{...}`) substring
//! 3. object unwrapping: `cleaned_data` key, `data` key, a single
//!    date/revenue object treated as a one-element list, else the first
//!    array-valued entry
//! 4. otherwise `MalformedInput`
//!
//! This tolerance is a compatibility contract, not an accident; do not
//! tighten it without also changing the collaborator.

use serde_json::{Map, Value};

use crate::domain::CanonicalRecord;
use crate::error::PipelineError;

/// Parse a text payload into record-like objects.
pub fn parse_series_input(text: &str) -> Result<Vec<Map<String, Value>>, PipelineError> {
    let value = match serde_json::from_str::<Value>(text) {
        Ok(v) => v,
        Err(_) => extract_embedded(text).ok_or_else(|| PipelineError::MalformedInput {
            detail: "could not parse input as JSON; expected an array of objects with \
                     'date' and 'revenue' keys"
                .to_string(),
        })?,
    };
    let items = unwrap_series(value)?;
    records_from_items(items)
}

/// Find the first embedded JSON document in free-form text.
///
/// Greedy per bracket kind: the slice from the first opening bracket to the
/// last matching closer, arrays before objects. One attempt each.
fn extract_embedded(text: &str) -> Option<Value> {
    for (open, close) in [('[', ']'), ('{', '}')] {
        if let (Some(start), Some(end)) = (text.find(open), text.rfind(close)) {
            if start < end {
                if let Ok(value) = serde_json::from_str::<Value>(&text[start..=end]) {
                    return Some(value);
                }
            }
        }
    }
    None
}

/// Apply the object-unwrapping rules until an array emerges.
fn unwrap_series(value: Value) -> Result<Vec<Value>, PipelineError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            if let Some(inner) = map.remove("cleaned_data") {
                return require_array(inner);
            }
            if let Some(inner) = map.remove("data") {
                return require_array(inner);
            }
            if map.contains_key("date") && map.contains_key("revenue") {
                return Ok(vec![Value::Object(map)]);
            }
            let array_key = map
                .iter()
                .find(|(_, v)| matches!(v, Value::Array(items) if !items.is_empty()))
                .map(|(k, _)| k.clone());
            if let Some(inner) = array_key.and_then(|k| map.remove(&k)) {
                return require_array(inner);
            }
            Err(malformed(&Value::Object(map)))
        }
        other => Err(malformed(&other)),
    }
}

fn require_array(value: Value) -> Result<Vec<Value>, PipelineError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(malformed(&other)),
    }
}

fn records_from_items(items: Vec<Value>) -> Result<Vec<Map<String, Value>>, PipelineError> {
    if items.is_empty() {
        return Err(PipelineError::MalformedInput {
            detail: "series is empty".to_string(),
        });
    }
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(map),
            other => Err(malformed(&other)),
        })
        .collect()
}

fn malformed(got: &Value) -> PipelineError {
    let mut preview = got.to_string();
    if preview.len() > 200 {
        preview.truncate(200);
    }
    PipelineError::MalformedInput {
        detail: format!(
            "expected a JSON array of objects with 'date' and 'revenue' keys, got: {preview}"
        ),
    }
}

/// Serialize a cleaned series into the record-object transport form.
pub fn records_from_cleaned(series: &[CanonicalRecord]) -> Vec<Map<String, Value>> {
    series
        .iter()
        .map(|record| {
            let mut map = Map::new();
            map.insert(
                "date".to_string(),
                Value::String(record.date.format("%Y-%m-%d").to_string()),
            );
            map.insert("revenue".to_string(), number(record.revenue));
            if let Some(expenses) = record.expenses {
                map.insert("expenses".to_string(), number(expenses));
            }
            map
        })
        .collect()
}

fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_a_plain_array() {
        let records =
            parse_series_input(r#"[{"date": "2023-01-01", "revenue": 100}]"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["revenue"], 100);
    }

    #[test]
    fn unwraps_cleaned_data_and_data_keys() {
        let records = parse_series_input(
            r#"{"cleaned_data": [{"date": "2023-01-01", "revenue": 100}]}"#,
        )
        .unwrap();
        assert_eq!(records.len(), 1);

        let records =
            parse_series_input(r#"{"data": [{"date": "2023-01-01", "revenue": 100}]}"#)
                .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn single_record_object_becomes_one_element_series() {
        let records =
            parse_series_input(r#"{"date": "2023-01-01", "revenue": 100}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["date"], "2023-01-01");
    }

    #[test]
    fn falls_back_to_the_first_array_valued_entry() {
        let records = parse_series_input(
            r#"{"note": "ok", "rows": [{"date": "2023-01-01", "revenue": 100}]}"#,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn extracts_json_embedded_in_prose() {
        let text = "Here is the cleaned data you asked for:\n\
                    [{\"date\": \"2023-01-01\", \"revenue\": 100}]\nLet me know!";
        let records = parse_series_input(text).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn garbage_fails_with_malformed_input() {
        let err = parse_series_input("no structured content here").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput { .. }));
    }

    #[test]
    fn empty_series_fails_with_malformed_input() {
        let err = parse_series_input("[]").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput { .. }));
    }

    #[test]
    fn scalar_elements_fail_with_malformed_input() {
        let err = parse_series_input("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput { .. }));
    }

    #[test]
    fn cleaned_records_round_trip_through_the_transport_form() {
        let series = vec![CanonicalRecord {
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            revenue: 100.5,
            expenses: None,
        }];
        let records = records_from_cleaned(&series);
        assert_eq!(records[0]["date"], "2023-01-01");
        assert_eq!(records[0]["revenue"], 100.5);
        assert!(!records[0].contains_key("expenses"));
    }
}
