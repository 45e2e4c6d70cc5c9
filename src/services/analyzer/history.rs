//! Transaction history fetch and program filtering
//!
//! The first RPC-heavy half of the pipeline: pull the wallet's recent
//! signature history, then fetch each transaction and keep the ones that
//! touch the Meteora DLMM program. The DLMM instructions of every kept
//! transaction are retained so the pool extraction stage does not have to
//! fetch the transactions a second time.

use tracing::{debug, warn};

use crate::core::error::AppResult;
use crate::core::types::TransactionRecord;
use crate::services::solana::{DecodedInstruction, TransactionSource};
use super::progress::{AnalysisStage, ProgressSink, TaskProgress};

/// A transaction that touched the DLMM program, with its DLMM instructions
#[derive(Debug, Clone)]
pub struct MatchedTransaction {
    pub record: TransactionRecord,
    pub instructions: Vec<DecodedInstruction>,
}

/// Fetch the wallet's signature history, dropping entries without a block time
pub async fn fetch_history(
    source: &dyn TransactionSource,
    wallet: &str,
    limit: usize,
) -> AppResult<Vec<TransactionRecord>> {
    let mut records = source.signatures_for_wallet(wallet, limit).await?;
    records.retain(|record| record.timestamp > 0);
    debug!(wallet, count = records.len(), "Signature history fetched");
    Ok(records)
}

/// Keep the transactions that carry at least one DLMM instruction
///
/// A transaction that fails to fetch or decode is skipped, not fatal: one
/// pruned or malformed transaction must not abort the wallet.
pub async fn filter_program_transactions(
    source: &dyn TransactionSource,
    sink: &dyn ProgressSink,
    wallet: &str,
    records: &[TransactionRecord],
    program_id: &str,
    progress_interval: usize,
) -> AppResult<Vec<MatchedTransaction>> {
    let total = records.len();
    let mut matched = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match source.instructions_for_signature(&record.signature).await {
            Ok(instructions) => {
                let program_instructions: Vec<DecodedInstruction> = instructions
                    .into_iter()
                    .filter(|ix| ix.program_id == program_id)
                    .collect();
                if !program_instructions.is_empty() {
                    matched.push(MatchedTransaction {
                        record: record.clone(),
                        instructions: program_instructions,
                    });
                }
            }
            Err(e) => {
                warn!(
                    wallet,
                    signature = %record.signature,
                    error = %e,
                    "Skipping transaction that failed to decode"
                );
            }
        }

        let processed = index + 1;
        if processed % progress_interval == 0 || processed == total {
            sink.report(&TaskProgress::counted(
                wallet,
                AnalysisStage::Filtering,
                processed,
                total,
            ))
            .await;
        }
    }

    debug!(
        wallet,
        matched = matched.len(),
        scanned = total,
        "Program filter finished"
    );
    Ok(matched)
}
