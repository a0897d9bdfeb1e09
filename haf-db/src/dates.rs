//! Date parsing for the `month_year` column.
//!
//! Depending on how the table was written, the column arrives as a SQL date,
//! a timestamp, or text. All of them collapse to a calendar date.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date format used for `month_year` text values: "YYYY-MM-DD"
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Format a NaiveDate as "YYYY-MM-DD"
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `month_year` text value.
///
/// Accepts "YYYY-MM-DD", timestamps with or without a zone, and the bare
/// month form "YYYY-MM" (read as the first of the month).
pub fn parse_month(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(date);
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(&format!("{s}-01"), DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_plain_dates() {
        assert_eq!(parse_month("2022-03-01"), Some(ymd(2022, 3, 1)));
        assert_eq!(parse_month(" 2022-03-01 "), Some(ymd(2022, 3, 1)));
    }

    #[test]
    fn parses_timestamps() {
        assert_eq!(parse_month("2022-03-01 00:00:00"), Some(ymd(2022, 3, 1)));
        assert_eq!(parse_month("2022-03-01T00:00:00"), Some(ymd(2022, 3, 1)));
        assert_eq!(parse_month("2022-03-01 12:30"), Some(ymd(2022, 3, 1)));
        assert_eq!(parse_month("2022-03-01T00:00:00+00:00"), Some(ymd(2022, 3, 1)));
    }

    #[test]
    fn parses_bare_month() {
        assert_eq!(parse_month("2022-03"), Some(ymd(2022, 3, 1)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_month(""), None);
        assert_eq!(parse_month("March 2022"), None);
        assert_eq!(parse_month("2022-13-01"), None);
    }

    #[test]
    fn format_round_trips() {
        let date = ymd(2021, 11, 1);
        assert_eq!(parse_month(&format_date(&date)), Some(date));
    }
}
