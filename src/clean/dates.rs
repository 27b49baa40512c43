//! Permissive date parsing.
//!
//! Monthly exports arrive with a mix of ISO dates, US-style dates, datetime
//! stamps, and month-granularity labels ("2023-01", "Jan 2023"). We accept a
//! fixed list of formats so parsing stays deterministic; month-granularity
//! values map to the first day of the month.

use chrono::{NaiveDate, NaiveDateTime};

const FULL_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%d %b %Y"];

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

const MONTH_FORMATS: [&str; 4] = ["%Y-%m", "%m/%Y", "%b %Y", "%B %Y"];

/// Parse a raw date cell; `None` when no accepted format matches.
pub fn parse_date_permissive(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    for fmt in FULL_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(stamp.date());
        }
    }

    // Month-granularity formats lack a day component, which chrono will not
    // fill in. Prepending a literal day pins them to the first of the month.
    for fmt in MONTH_FORMATS {
        if let Ok(date) =
            NaiveDate::parse_from_str(&format!("01 {value}"), &format!("%d {fmt}"))
        {
            return Some(date);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_and_us_styles() {
        assert_eq!(parse_date_permissive("2023-01-15"), Some(date(2023, 1, 15)));
        assert_eq!(parse_date_permissive("2023/01/15"), Some(date(2023, 1, 15)));
        assert_eq!(parse_date_permissive("01/15/2023"), Some(date(2023, 1, 15)));
        assert_eq!(parse_date_permissive("1/15/2023"), Some(date(2023, 1, 15)));
        assert_eq!(parse_date_permissive("01-15-2023"), Some(date(2023, 1, 15)));
        assert_eq!(parse_date_permissive("15 Jan 2023"), Some(date(2023, 1, 15)));
    }

    #[test]
    fn parses_datetime_stamps_to_their_date() {
        assert_eq!(
            parse_date_permissive("2023-01-15T00:00:00"),
            Some(date(2023, 1, 15))
        );
        assert_eq!(
            parse_date_permissive("2023-01-15 08:30:00"),
            Some(date(2023, 1, 15))
        );
    }

    #[test]
    fn month_granularity_pins_to_first_of_month() {
        assert_eq!(parse_date_permissive("2023-01"), Some(date(2023, 1, 1)));
        assert_eq!(parse_date_permissive("01/2023"), Some(date(2023, 1, 1)));
        assert_eq!(parse_date_permissive("Jan 2023"), Some(date(2023, 1, 1)));
        assert_eq!(parse_date_permissive("January 2023"), Some(date(2023, 1, 1)));
    }

    #[test]
    fn rejects_junk_and_blanks() {
        assert_eq!(parse_date_permissive("not-a-date"), None);
        assert_eq!(parse_date_permissive(""), None);
        assert_eq!(parse_date_permissive("2023-13-01"), None);
    }
}
