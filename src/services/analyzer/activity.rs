//! Activity metrics
//!
//! Pure calculations over the timestamps of the DLMM-matched transactions:
//! the date of the earliest transaction, and the number of distinct ISO
//! weeks and calendar months (both UTC) with at least one transaction.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::utils::time;
use super::history::MatchedTransaction;

/// Summary of when a wallet was active on the protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySummary {
    pub first_tx: Option<NaiveDate>,
    pub active_weeks: u32,
    pub active_months: u32,
}

/// Compute activity metrics from the matched transactions
pub fn summarize(transactions: &[MatchedTransaction]) -> ActivitySummary {
    let mut weeks = HashSet::new();
    let mut months = HashSet::new();
    let mut earliest: Option<i64> = None;

    for tx in transactions {
        let ts = tx.record.timestamp;
        if let Some(week) = time::iso_week_bucket(ts) {
            weeks.insert(week);
        }
        if let Some(month) = time::month_bucket(ts) {
            months.insert(month);
        }
        earliest = Some(match earliest {
            Some(current) => current.min(ts),
            None => ts,
        });
    }

    ActivitySummary {
        first_tx: earliest.and_then(time::utc_date_from_timestamp),
        active_weeks: weeks.len() as u32,
        active_months: months.len() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TransactionRecord;
    use chrono::NaiveDate;

    fn matched(signature: &str, timestamp: i64) -> MatchedTransaction {
        MatchedTransaction {
            record: TransactionRecord {
                signature: signature.to_string(),
                timestamp,
            },
            instructions: Vec::new(),
        }
    }

    fn ts(date: &str) -> i64 {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp()
    }

    #[test]
    fn test_empty_history() {
        let summary = summarize(&[]);
        assert_eq!(summary.first_tx, None);
        assert_eq!(summary.active_weeks, 0);
        assert_eq!(summary.active_months, 0);
    }

    #[test]
    fn test_distinct_weeks_and_months() {
        let txs = vec![
            matched("a", ts("2024-03-04")), // ISO week 10, March
            matched("b", ts("2024-03-05")), // same week, same month
            matched("c", ts("2024-03-12")), // week 11, March
            matched("d", ts("2024-04-01")), // week 14, April
        ];
        let summary = summarize(&txs);
        assert_eq!(summary.active_weeks, 3);
        assert_eq!(summary.active_months, 2);
        assert_eq!(
            summary.first_tx,
            Some(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
        );
    }

    #[test]
    fn test_iso_week_spans_year_boundary() {
        // 2021-01-01 belongs to ISO week 53 of 2020
        let txs = vec![
            matched("a", ts("2020-12-30")),
            matched("b", ts("2021-01-01")),
        ];
        let summary = summarize(&txs);
        assert_eq!(summary.active_weeks, 1);
        assert_eq!(summary.active_months, 2);
    }

    #[test]
    fn test_first_tx_is_earliest_not_first() {
        let txs = vec![
            matched("newer", ts("2024-06-01")),
            matched("older", ts("2023-01-15")),
        ];
        let summary = summarize(&txs);
        assert_eq!(
            summary.first_tx,
            Some(NaiveDate::from_ymd_opt(2023, 1, 15).unwrap())
        );
    }
}
