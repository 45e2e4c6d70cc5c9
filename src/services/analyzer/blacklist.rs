//! Wallet blacklist
//!
//! Loads the set of flagged wallet addresses from a CSV file with an
//! `address` column. A missing file is treated as an empty blacklist so the
//! analyzer keeps working in environments that do not ship the list.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::core::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct BlacklistRow {
    address: String,
}

/// Set of flagged wallet addresses
#[derive(Debug, Default)]
pub struct Blacklist {
    addresses: HashSet<String>,
}

impl Blacklist {
    /// Load the blacklist from a CSV file, returning an empty set when the
    /// file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            warn!(
                path = %path.display(),
                "Blacklist file not found, continuing with an empty blacklist"
            );
            return Ok(Self::default());
        }

        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            AppError::report(format!(
                "Failed to open blacklist '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut addresses = HashSet::new();
        for row in reader.deserialize::<BlacklistRow>() {
            let row = row.map_err(|e| {
                AppError::report(format!(
                    "Malformed blacklist row in '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            let address = row.address.trim();
            if !address.is_empty() {
                addresses.insert(address.to_string());
            }
        }

        info!(count = addresses.len(), "Loaded wallet blacklist");
        Ok(Self { addresses })
    }

    /// Build a blacklist from an in-memory address list
    pub fn from_addresses<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            addresses: addresses.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the wallet is flagged
    pub fn contains(&self, wallet: &str) -> bool {
        self.addresses.contains(wallet.trim())
    }

    /// Number of flagged addresses
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_csv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "address,source").unwrap();
        writeln!(file, "WalletA,exploit").unwrap();
        writeln!(file, "  WalletB  ,mixer").unwrap();

        let blacklist = Blacklist::load(file.path()).unwrap();
        assert_eq!(blacklist.len(), 2);
        assert!(blacklist.contains("WalletA"));
        assert!(blacklist.contains("WalletB"));
        assert!(blacklist.contains(" WalletB "));
        assert!(!blacklist.contains("WalletC"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let blacklist = Blacklist::load("definitely-not-here.csv").unwrap();
        assert!(blacklist.is_empty());
        assert!(!blacklist.contains("WalletA"));
    }

    #[test]
    fn test_file_without_address_column_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "wallet,source").unwrap();
        writeln!(file, "WalletA,exploit").unwrap();

        assert!(Blacklist::load(file.path()).is_err());
    }
}
