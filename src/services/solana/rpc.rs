//! Solana RPC client wrapper
//!
//! Thin layer over the nonblocking `solana-client`, exposing exactly the two
//! operations the analysis pipeline needs: a wallet's signature history and
//! the parsed instructions of a single transaction. The [`TransactionSource`]
//! trait is the seam the analyzer is written against, so the pipeline can be
//! tested without a live cluster.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_client::GetConfirmedSignaturesForAddress2Config;
use solana_client::rpc_config::RpcTransactionConfig;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_transaction_status::{
    EncodedTransaction, UiInstruction, UiMessage, UiParsedInstruction, UiTransactionEncoding,
};
use tracing::debug;

use crate::core::error::{AppError, AppResult};
use crate::core::types::TransactionRecord;
use crate::utils::validation;
use super::types::DecodedInstruction;

/// Source of wallet transaction data
///
/// Implemented by [`SolanaRpcClient`] for production and mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Most recent signatures for a wallet, newest first, with block times
    async fn signatures_for_wallet(
        &self,
        wallet: &str,
        limit: usize,
    ) -> AppResult<Vec<TransactionRecord>>;

    /// Parsed instructions of a confirmed transaction
    async fn instructions_for_signature(
        &self,
        signature: &str,
    ) -> AppResult<Vec<DecodedInstruction>>;
}

/// Solana RPC client bound to a single endpoint
pub struct SolanaRpcClient {
    client: RpcClient,
    commitment: CommitmentConfig,
    endpoint: String,
}

impl SolanaRpcClient {
    /// Create a client for one endpoint of the rotation pool
    pub fn new(endpoint: impl Into<String>, commitment: &str, timeout_ms: u64) -> Self {
        let endpoint = endpoint.into();
        let commitment = parse_commitment(commitment);
        let client = RpcClient::new_with_timeout_and_commitment(
            endpoint.clone(),
            Duration::from_millis(timeout_ms),
            commitment,
        );
        Self {
            client,
            commitment,
            endpoint,
        }
    }

    /// Endpoint URL this client talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn parse_wallet(&self, wallet: &str) -> AppResult<Pubkey> {
        validation::parse_wallet_pubkey(wallet)
    }
}

/// Map a commitment string to its config, defaulting to confirmed
fn parse_commitment(commitment: &str) -> CommitmentConfig {
    match commitment {
        "processed" => CommitmentConfig::processed(),
        "finalized" => CommitmentConfig::finalized(),
        _ => CommitmentConfig::confirmed(),
    }
}

#[async_trait]
impl TransactionSource for SolanaRpcClient {
    async fn signatures_for_wallet(
        &self,
        wallet: &str,
        limit: usize,
    ) -> AppResult<Vec<TransactionRecord>> {
        let pubkey = self.parse_wallet(wallet)?;

        let config = GetConfirmedSignaturesForAddress2Config {
            before: None,
            until: None,
            limit: Some(limit),
            commitment: Some(self.commitment),
        };

        let statuses = self
            .client
            .get_signatures_for_address_with_config(&pubkey, config)
            .await
            .map_err(|e| {
                AppError::network_at(
                    format!("Failed to fetch signatures for {}: {}", wallet, e),
                    self.endpoint.clone(),
                )
            })?;

        debug!(wallet, count = statuses.len(), "Fetched signature history");

        Ok(statuses
            .into_iter()
            .map(|status| TransactionRecord {
                signature: status.signature,
                timestamp: status.block_time.unwrap_or(0),
            })
            .collect())
    }

    async fn instructions_for_signature(
        &self,
        signature: &str,
    ) -> AppResult<Vec<DecodedInstruction>> {
        let parsed_signature = Signature::from_str(signature).map_err(|_| {
            AppError::validation_for(
                format!("'{}' is not a valid transaction signature", signature),
                "signature".to_string(),
                signature.to_string(),
            )
        })?;

        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::JsonParsed),
            commitment: Some(self.commitment),
            max_supported_transaction_version: Some(0),
        };

        let transaction = self
            .client
            .get_transaction_with_config(&parsed_signature, config)
            .await
            .map_err(|e| {
                AppError::rpc_for_signature(
                    format!("Failed to fetch transaction: {}", e),
                    signature.to_string(),
                )
            })?;

        let mut instructions = Vec::new();
        if let EncodedTransaction::Json(ui_transaction) = transaction.transaction.transaction {
            if let UiMessage::Parsed(message) = ui_transaction.message {
                for instruction in message.instructions {
                    match instruction {
                        UiInstruction::Parsed(UiParsedInstruction::PartiallyDecoded(decoded)) => {
                            instructions.push(DecodedInstruction::new(
                                decoded.program_id,
                                decoded.accounts,
                            ));
                        }
                        UiInstruction::Parsed(UiParsedInstruction::Parsed(parsed)) => {
                            // Known-program instructions carry no flat account
                            // list, only the program id matters here
                            instructions.push(DecodedInstruction::new(
                                parsed.program_id,
                                Vec::new(),
                            ));
                        }
                        UiInstruction::Compiled(_) => {}
                    }
                }
            }
        }

        debug!(
            signature,
            count = instructions.len(),
            "Decoded transaction instructions"
        );

        Ok(instructions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commitment() {
        assert_eq!(parse_commitment("processed"), CommitmentConfig::processed());
        assert_eq!(parse_commitment("finalized"), CommitmentConfig::finalized());
        assert_eq!(parse_commitment("confirmed"), CommitmentConfig::confirmed());
        assert_eq!(parse_commitment("bogus"), CommitmentConfig::confirmed());
    }

    #[tokio::test]
    async fn test_invalid_wallet_rejected_before_any_request() {
        let client = SolanaRpcClient::new("http://127.0.0.1:1", "confirmed", 100);
        let result = client.signatures_for_wallet("not-a-wallet", 10).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_invalid_signature_rejected_before_any_request() {
        let client = SolanaRpcClient::new("http://127.0.0.1:1", "confirmed", 100);
        let result = client.instructions_for_signature("zzz").await;
        assert!(result.is_err());
    }
}
