//! Date coercion for uploaded cells.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Days between the Excel epoch (1899-12-30) and the Unix epoch.
const EXCEL_UNIX_OFFSET_DAYS: f64 = 25_569.0;
const MS_PER_DAY: f64 = 86_400_000.0;
/// Largest timestamp chrono can represent comfortably, in milliseconds.
const MAX_ABS_MS: f64 = 8.64e15;

/// Convert an Excel serial day number to its UTC calendar date.
pub fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let ms = ((serial - EXCEL_UNIX_OFFSET_DAYS) * MS_PER_DAY).round();
    if ms.abs() > MAX_ABS_MS {
        return None;
    }
    DateTime::from_timestamp_millis(ms as i64).map(|dt| dt.date_naive())
}

/// Parse a textual date. Plain numbers are treated as Excel serials.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(serial) = s.parse::<f64>() {
        return from_excel_serial(serial);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc().date());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in ["%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    // Year-month only: first of the month.
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn excel_serial_known_dates() {
        assert_eq!(from_excel_serial(25_569.0), Some(ymd(1970, 1, 1)));
        assert_eq!(from_excel_serial(45_444.0), Some(ymd(2024, 6, 1)));
        assert_eq!(from_excel_serial(45_292.0), Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn excel_serial_with_time_fraction_keeps_the_day() {
        assert_eq!(from_excel_serial(45_444.75), Some(ymd(2024, 6, 1)));
    }

    #[test]
    fn excel_serial_rejects_non_finite() {
        assert_eq!(from_excel_serial(f64::NAN), None);
        assert_eq!(from_excel_serial(f64::INFINITY), None);
        assert_eq!(from_excel_serial(1e12), None);
    }

    #[test]
    fn parses_iso_and_variants() {
        assert_eq!(parse_date_text("2024-06-01"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date_text(" 2024-06-01 "), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date_text("2024-06-01T00:00:00Z"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date_text("2024-06-01T23:30:00-02:00"), Some(ymd(2024, 6, 2)));
        assert_eq!(parse_date_text("2024-06-01 10:00:00"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date_text("2024/06/01"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date_text("06/01/2024"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date_text("2024-06"), Some(ymd(2024, 6, 1)));
    }

    #[test]
    fn numeric_text_is_a_serial() {
        assert_eq!(parse_date_text("45444"), Some(ymd(2024, 6, 1)));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_date_text(""), None);
        assert_eq!(parse_date_text("not a date"), None);
        assert_eq!(parse_date_text("2024-13-01"), None);
    }
}
