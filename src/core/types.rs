//! Core type definitions for the domain model
//!
//! Addresses travel through the pipeline as plain base-58 strings; this
//! module holds the records built around them: the transaction record,
//! the terminal metrics record the report renderers consume, and the
//! output-format selector.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::AppError;

/// A confirmed transaction signature with its block timestamp
///
/// Records without a block timestamp are dropped at fetch time, so every
/// record inside the pipeline carries a real timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction signature (base-58)
    pub signature: String,
    /// Block confirmation time, unix seconds (UTC)
    pub timestamp: i64,
}

impl TransactionRecord {
    /// Create a new record
    pub fn new(signature: impl Into<String>, timestamp: i64) -> Self {
        Self {
            signature: signature.into(),
            timestamp,
        }
    }
}

/// Terminal per-wallet metrics record
///
/// Created fresh per wallet, filled in incrementally by each pipeline
/// stage, immutable once the wallet's run completes. Fields keep their
/// zero/false/absent defaults for any stage that could not complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletMetrics {
    /// Analyzed wallet address (as submitted)
    pub wallet: String,
    /// Sum of claimed fees across all discovered pools, USD
    pub total_fees: f64,
    /// Count of pools whose claimed fee is at least the reporting threshold
    pub pools_with_fees: u32,
    /// UTC date of the earliest Meteora transaction, if any
    pub first_tx: Option<NaiveDate>,
    /// Count of distinct (ISO year, ISO week) buckets with activity
    pub active_weeks: u32,
    /// Count of distinct (year, month) buckets with activity
    pub active_months: u32,
    /// Wallet holds an LP Army Certificate cNFT
    pub cnft: bool,
    /// Wallet appears in the static blacklist
    pub blacklist: bool,
}

impl WalletMetrics {
    /// Create an all-defaults record for a wallet
    pub fn new(wallet: impl Into<String>) -> Self {
        Self {
            wallet: wallet.into(),
            total_fees: 0.0,
            pools_with_fees: 0,
            first_tx: None,
            active_weeks: 0,
            active_months: 0,
            cnft: false,
            blacklist: false,
        }
    }

    /// First-transaction date rendered as `DD.MM.YYYY`, or `N/A`
    pub fn first_tx_display(&self) -> String {
        match self.first_tx {
            Some(date) => crate::utils::time::format_report_date(date),
            None => "N/A".to_string(),
        }
    }
}

/// Report output format selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Per-wallet text blocks only
    Text,
    /// CSV file only
    Csv,
    /// Text blocks and CSV file
    All,
}

impl OutputFormat {
    /// Whether text blocks should be rendered
    pub fn wants_text(self) -> bool {
        matches!(self, Self::Text | Self::All)
    }

    /// Whether a CSV file should be written
    pub fn wants_csv(self) -> bool {
        matches!(self, Self::Csv | Self::All)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Csv => "csv",
            Self::All => "all",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "all" | "both" => Ok(Self::All),
            other => Err(AppError::validation_for(
                "unknown output format",
                "format",
                other,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_metrics_defaults() {
        let metrics = WalletMetrics::new("wallet1");
        assert_eq!(metrics.total_fees, 0.0);
        assert_eq!(metrics.pools_with_fees, 0);
        assert_eq!(metrics.active_weeks, 0);
        assert_eq!(metrics.active_months, 0);
        assert!(!metrics.cnft);
        assert!(!metrics.blacklist);
        assert_eq!(metrics.first_tx_display(), "N/A");
    }

    #[test]
    fn test_first_tx_formatting() {
        let mut metrics = WalletMetrics::new("wallet1");
        metrics.first_tx = NaiveDate::from_ymd_opt(2023, 11, 14);
        assert_eq!(metrics.first_tx_display(), "14.11.2023");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("all".parse::<OutputFormat>().unwrap(), OutputFormat::All);
        assert!("xml".parse::<OutputFormat>().is_err());
        assert!(OutputFormat::All.wants_text() && OutputFormat::All.wants_csv());
        assert!(!OutputFormat::Csv.wants_text());
    }
}
