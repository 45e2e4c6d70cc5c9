//! Report rendering
//!
//! Turns a batch of wallet metrics into the two delivery formats: numbered
//! per-wallet text blocks for chat/console output, and a CSV file whose
//! column set is kept bit-for-bit compatible with the reports downstream
//! spreadsheets already consume (including the legacy `№` and `сNFT`
//! headers).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::error::{AppError, AppResult};
use crate::core::types::WalletMetrics;
use crate::utils::time;

/// CSV column order, fixed for downstream compatibility
const CSV_HEADERS: [&str; 9] = [
    "№",
    "Wallet",
    "Fees$",
    "Pools",
    "First Tx Date",
    "Weeks",
    "Months",
    "Blacklist",
    "сNFT",
];

/// One CSV row of the report
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ReportRow {
    #[serde(rename = "№")]
    pub number: usize,
    #[serde(rename = "Wallet")]
    pub wallet: String,
    #[serde(rename = "Fees$")]
    pub fees: String,
    #[serde(rename = "Pools")]
    pub pools: u32,
    #[serde(rename = "First Tx Date")]
    pub first_tx: String,
    #[serde(rename = "Weeks")]
    pub weeks: u32,
    #[serde(rename = "Months")]
    pub months: u32,
    #[serde(rename = "Blacklist")]
    pub blacklist: String,
    #[serde(rename = "сNFT")]
    pub cnft: String,
}

impl ReportRow {
    fn from_metrics(number: usize, metrics: &WalletMetrics) -> Self {
        Self {
            number,
            wallet: metrics.wallet.clone(),
            fees: format!("{:.2}", metrics.total_fees),
            pools: metrics.pools_with_fees,
            first_tx: metrics.first_tx_display(),
            weeks: metrics.active_weeks,
            months: metrics.active_months,
            blacklist: yes_no(metrics.blacklist),
            cnft: yes_no(metrics.cnft),
        }
    }
}

fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}

/// Render one wallet's metrics as a numbered text block
pub fn format_wallet_block(number: usize, metrics: &WalletMetrics) -> String {
    format!(
        "{} Wallet:\n\
         {}\n\
         💵 Total fees claimed: ${:.2}\n\
         🛀 Pools with claimed fees: {}\n\
         🗓 First tx: {}\n\
         📅 Number of active weeks: {}\n\
         📅 Number of active months: {}\n\
         🖼 LP Army Certificate сNFT: {}\n\
         🚫 Blacklist kelsier_addresses: {}",
        number,
        metrics.wallet,
        metrics.total_fees,
        metrics.pools_with_fees,
        metrics.first_tx_display(),
        metrics.active_weeks,
        metrics.active_months,
        yes_no(metrics.cnft),
        yes_no(metrics.blacklist),
    )
}

/// Render the whole batch as text blocks separated by blank lines
pub fn format_text_report(results: &[WalletMetrics]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(index, metrics)| format_wallet_block(index + 1, metrics))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// First `Meteora_{YYYYMMDD}_{counter}.csv` name not already taken in `dir`
pub fn generate_csv_filename(dir: &Path) -> PathBuf {
    let today = time::today_compact();
    let mut counter = 0;
    loop {
        let candidate = dir.join(format!("Meteora_{}_{}.csv", today, counter));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Write the batch as a CSV report, returning the path written
pub fn write_csv_report(results: &[WalletMetrics], dir: &Path) -> AppResult<PathBuf> {
    let path = generate_csv_filename(dir);

    let mut writer = csv::Writer::from_path(&path).map_err(|e| {
        AppError::report(format!("Failed to create '{}': {}", path.display(), e))
    })?;

    for (index, metrics) in results.iter().enumerate() {
        writer
            .serialize(ReportRow::from_metrics(index + 1, metrics))
            .map_err(|e| AppError::report(format!("Failed to write CSV row: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::report(format!("Failed to flush CSV: {}", e)))?;

    info!(path = %path.display(), rows = results.len(), "CSV report saved");
    Ok(path)
}

/// Read a previously written report back into rows
pub fn read_csv_report(path: &Path) -> AppResult<Vec<ReportRow>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        AppError::report(format!("Failed to open '{}': {}", path.display(), e))
    })?;

    let headers = reader
        .headers()
        .map_err(|e| AppError::report(format!("Failed to read CSV headers: {}", e)))?
        .clone();
    if headers.iter().ne(CSV_HEADERS) {
        return Err(AppError::report(format!(
            "Unexpected report headers in '{}'",
            path.display()
        )));
    }

    reader
        .deserialize::<ReportRow>()
        .map(|row| row.map_err(|e| AppError::report(format!("Malformed CSV row: {}", e))))
        .collect()
}
