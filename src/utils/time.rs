//! Time handling utilities
//!
//! Unix-timestamp to UTC calendar conversions used by the activity
//! metrics calculator and the report renderers.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Convert unix seconds to a UTC calendar date
///
/// Returns `None` for timestamps outside chrono's representable range.
pub fn utc_date_from_timestamp(timestamp: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

/// ISO-8601 (year, week) bucket key for a UTC timestamp
pub fn iso_week_bucket(timestamp: i64) -> Option<(i32, u32)> {
    utc_date_from_timestamp(timestamp).map(|date| {
        let iso = date.iso_week();
        (iso.year(), iso.week())
    })
}

/// Calendar (year, month) bucket key for a UTC timestamp
pub fn month_bucket(timestamp: i64) -> Option<(i32, u32)> {
    utc_date_from_timestamp(timestamp).map(|date| (date.year(), date.month()))
}

/// Format a UTC date for user-facing output (`DD.MM.YYYY`)
pub fn format_report_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Today's date in `YYYYMMDD` form, used for report file naming
pub fn today_compact() -> String {
    Utc::now().format("%Y%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_date_conversion() {
        // 2023-11-14 22:13:20 UTC
        let date = utc_date_from_timestamp(1_700_000_000).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 11, 14).unwrap());
    }

    #[test]
    fn test_iso_week_bucket_year_boundary() {
        // 2021-01-01 falls into ISO week 53 of 2020
        let ts = NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp();
        assert_eq!(iso_week_bucket(ts), Some((2020, 53)));
    }

    #[test]
    fn test_month_bucket() {
        assert_eq!(month_bucket(1_700_000_000), Some((2023, 11)));
        // 2022-04-15 ~ 1650000000
        assert_eq!(month_bucket(1_650_000_000), Some((2022, 4)));
    }

    #[test]
    fn test_report_date_format() {
        let date = NaiveDate::from_ymd_opt(2022, 4, 15).unwrap();
        assert_eq!(format_report_date(date), "15.04.2022");
    }
}
