//! Input validation helpers
//!
//! Wallet addresses reach the pipeline as raw user input (CLI arguments
//! or chat messages), so they are validated syntactically before any
//! network call is made on their behalf.

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use crate::core::error::{AppError, AppResult};

/// Validate that a string parses as a Solana public key
pub fn validate_wallet_address(address: &str) -> AppResult<()> {
    if address.len() < 32 || address.len() > 44 {
        return Err(AppError::validation_for(
            "invalid address length",
            "wallet",
            address,
        ));
    }

    Pubkey::from_str(address).map_err(|e| {
        AppError::validation_for(
            format!("not a valid base-58 public key: {}", e),
            "wallet".to_string(),
            address.to_string(),
        )
    })?;

    Ok(())
}

/// Parse a wallet address into a `Pubkey`, mapping failures to a
/// validation error
pub fn parse_wallet_pubkey(address: &str) -> AppResult<Pubkey> {
    validate_wallet_address(address)?;
    Pubkey::from_str(address)
        .map_err(|e| AppError::validation(format!("invalid wallet address: {}", e)))
}

/// Split a free-text message into candidate wallet addresses
///
/// Splits on any whitespace and drops empty fragments; no validation is
/// applied here so the pipeline can report a per-wallet error row.
pub fn split_wallet_list(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "LBUZKhRxPF3XUpBCjp4YzTKgLccjZhTSDM9YuVaPwxo";

    #[test]
    fn test_valid_address() {
        assert!(validate_wallet_address(VALID).is_ok());
        assert!(parse_wallet_pubkey(VALID).is_ok());
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(validate_wallet_address("short").is_err());
        // 0, O, I, l are not base-58
        assert!(validate_wallet_address("0OIl000000000000000000000000000000000000").is_err());
    }

    #[test]
    fn test_split_wallet_list() {
        let wallets = split_wallet_list("  abc   def\nghi\t ");
        assert_eq!(wallets, vec!["abc", "def", "ghi"]);
        assert!(split_wallet_list("   ").is_empty());
    }
}
