//! Pool extraction and fee aggregation
//!
//! The DLMM instruction layout places the LB pair (pool) account at a fixed
//! position in the account list. Extraction walks the matched transactions,
//! collects unique pool addresses in first-seen order, and the aggregation
//! stage sums the wallet's claimed fees across those pools through the DLMM
//! REST API.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::core::constants::DLMM_POOL_ACCOUNT_INDEX;
use crate::core::error::AppResult;
use crate::services::meteora::FeeSource;
use super::history::MatchedTransaction;
use super::progress::{AnalysisStage, ProgressSink, TaskProgress};

/// Unique pool addresses referenced by the matched transactions,
/// in first-seen order
pub async fn extract_pools(
    sink: &dyn ProgressSink,
    wallet: &str,
    transactions: &[MatchedTransaction],
    progress_interval: usize,
) -> Vec<String> {
    let total = transactions.len();
    let mut seen = HashSet::new();
    let mut pools = Vec::new();

    for (index, tx) in transactions.iter().enumerate() {
        // One pool per transaction: the first instruction with enough accounts
        // wins, instructions with short account lists (e.g. admin calls) are
        // skipped over
        for instruction in &tx.instructions {
            if let Some(pool) = instruction.account_at(DLMM_POOL_ACCOUNT_INDEX) {
                if seen.insert(pool.to_string()) {
                    pools.push(pool.to_string());
                }
                break;
            }
        }

        let processed = index + 1;
        if processed % progress_interval == 0 || processed == total {
            sink.report(&TaskProgress::counted(
                wallet,
                AnalysisStage::Pools,
                processed,
                total,
            ))
            .await;
        }
    }

    debug!(wallet, pools = pools.len(), "Extracted pool addresses");
    pools
}

/// Claimed fee totals across all of a wallet's pools
#[derive(Debug, Clone, PartialEq)]
pub struct FeeSummary {
    /// Total USD fees claimed across all pools
    pub total_fees: f64,

    /// Pools whose claimed fees reach the threshold
    pub pools_with_fees: u32,
}

/// Sum claimed fees over the wallet's pools
///
/// A pool whose lookup fails contributes zero fees; the failure is logged
/// and the aggregation continues.
pub async fn aggregate_fees(
    source: &dyn FeeSource,
    sink: &dyn ProgressSink,
    wallet: &str,
    pools: &[String],
    fee_threshold_usd: f64,
    progress_interval: usize,
) -> AppResult<FeeSummary> {
    let total = pools.len();
    let mut summary = FeeSummary {
        total_fees: 0.0,
        pools_with_fees: 0,
    };

    for (index, pool) in pools.iter().enumerate() {
        match source.claimed_fees_usd(wallet, pool).await {
            Ok(fees) => {
                summary.total_fees += fees;
                if fees >= fee_threshold_usd {
                    summary.pools_with_fees += 1;
                }
            }
            Err(e) => {
                warn!(wallet, pool = %pool, error = %e, "Fee lookup failed, counting zero");
            }
        }

        let processed = index + 1;
        if processed % progress_interval == 0 || processed == total {
            sink.report(&TaskProgress::counted(
                wallet,
                AnalysisStage::Fees,
                processed,
                total,
            ))
            .await;
        }
    }

    debug!(
        wallet,
        total_fees = summary.total_fees,
        pools_with_fees = summary.pools_with_fees,
        "Fee aggregation finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::METEORA_DLMM_PROGRAM;
    use crate::core::error::AppError;
    use crate::core::types::TransactionRecord;
    use crate::services::analyzer::progress::NullProgressSink;
    use crate::services::meteora::MockFeeSource;
    use crate::services::solana::DecodedInstruction;
    use mockall::predicate::eq;

    fn matched(signature: &str, accounts: Vec<&str>) -> MatchedTransaction {
        matched_multi(signature, vec![accounts])
    }

    fn matched_multi(signature: &str, instructions: Vec<Vec<&str>>) -> MatchedTransaction {
        MatchedTransaction {
            record: TransactionRecord {
                signature: signature.to_string(),
                timestamp: 1_700_000_000,
            },
            instructions: instructions
                .into_iter()
                .map(|accounts| {
                    DecodedInstruction::new(
                        METEORA_DLMM_PROGRAM,
                        accounts.into_iter().map(String::from).collect(),
                    )
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_extract_unique_pools_in_order() {
        let txs = vec![
            matched("sig-1", vec!["a", "b", "pool-1"]),
            matched("sig-2", vec!["a", "b", "pool-2"]),
            matched("sig-3", vec!["a", "b", "pool-1"]),
        ];
        let pools = extract_pools(&NullProgressSink, "WalletA", &txs, 5).await;
        assert_eq!(pools, vec!["pool-1", "pool-2"]);
    }

    #[tokio::test]
    async fn test_one_pool_per_transaction() {
        let txs = vec![
            matched_multi("sig-1", vec![vec!["a", "b", "pool-1"], vec!["a", "b", "pool-2"]]),
            matched("sig-2", vec!["a", "b", "pool-3"]),
        ];
        let pools = extract_pools(&NullProgressSink, "WalletA", &txs, 5).await;
        assert_eq!(pools, vec!["pool-1", "pool-3"]);
    }

    #[tokio::test]
    async fn test_short_first_instruction_falls_through() {
        let txs = vec![matched_multi(
            "sig-1",
            vec![vec!["a", "b"], vec!["a", "b", "pool-1"]],
        )];
        let pools = extract_pools(&NullProgressSink, "WalletA", &txs, 5).await;
        assert_eq!(pools, vec!["pool-1"]);
    }

    #[tokio::test]
    async fn test_short_account_lists_are_skipped() {
        let txs = vec![
            matched("sig-1", vec!["a", "b"]),
            matched("sig-2", vec!["a", "b", "pool-1"]),
        ];
        let pools = extract_pools(&NullProgressSink, "WalletA", &txs, 5).await;
        assert_eq!(pools, vec!["pool-1"]);
    }

    #[tokio::test]
    async fn test_aggregate_fees_with_threshold() {
        let mut source = MockFeeSource::new();
        source
            .expect_claimed_fees_usd()
            .with(eq("WalletA"), eq("pool-1"))
            .returning(|_, _| Ok(0.02));
        source
            .expect_claimed_fees_usd()
            .with(eq("WalletA"), eq("pool-2"))
            .returning(|_, _| Ok(0.0));
        source
            .expect_claimed_fees_usd()
            .with(eq("WalletA"), eq("pool-3"))
            .returning(|_, _| Ok(5.00));

        let pools = vec![
            "pool-1".to_string(),
            "pool-2".to_string(),
            "pool-3".to_string(),
        ];
        let summary = aggregate_fees(&source, &NullProgressSink, "WalletA", &pools, 0.01, 2)
            .await
            .unwrap();

        assert!((summary.total_fees - 5.02).abs() < 1e-9);
        assert_eq!(summary.pools_with_fees, 2);
    }

    #[tokio::test]
    async fn test_failed_pool_lookup_counts_zero() {
        let mut source = MockFeeSource::new();
        source
            .expect_claimed_fees_usd()
            .with(eq("WalletA"), eq("pool-1"))
            .returning(|_, _| Err(AppError::external("meteora", "timeout")));
        source
            .expect_claimed_fees_usd()
            .with(eq("WalletA"), eq("pool-2"))
            .returning(|_, _| Ok(1.5));

        let pools = vec!["pool-1".to_string(), "pool-2".to_string()];
        let summary = aggregate_fees(&source, &NullProgressSink, "WalletA", &pools, 0.01, 2)
            .await
            .unwrap();

        assert_eq!(summary.total_fees, 1.5);
        assert_eq!(summary.pools_with_fees, 1);
    }

    #[tokio::test]
    async fn test_no_pools() {
        let source = MockFeeSource::new();
        let summary = aggregate_fees(&source, &NullProgressSink, "WalletA", &[], 0.01, 2)
            .await
            .unwrap();
        assert_eq!(summary.total_fees, 0.0);
        assert_eq!(summary.pools_with_fees, 0);
    }
}
