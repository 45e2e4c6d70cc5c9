//! Wallet analysis pipeline
//!
//! Orchestrates the per-wallet stages in order: blacklist check, certificate
//! check, history fetch, DLMM filter, activity metrics, pool extraction and
//! fee aggregation. Stages degrade independently: a failed external lookup
//! leaves its fields at their defaults and the remaining stages still run,
//! so one flaky API never costs a whole batch.

pub mod activity;
pub mod blacklist;
pub mod certificate;
pub mod history;
pub mod pools;
pub mod progress;

use std::sync::Arc;

use tracing::{info, warn};

use crate::core::constants::METEORA_DLMM_PROGRAM;
use crate::core::error::AppResult;
use crate::core::types::WalletMetrics;
use crate::services::helius::AssetSource;
use crate::services::meteora::FeeSource;
use crate::services::solana::TransactionSource;
use crate::utils::validation;

pub use blacklist::Blacklist;
pub use progress::{
    AnalysisStage, LogProgressSink, NullProgressSink, ProgressSink, TaskProgress, TaskState,
    TaskTracker,
};

/// Tunable knobs of the analysis pipeline
#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    /// Maximum signatures fetched per wallet
    pub signature_limit: usize,

    /// Minimum claimed fee (USD) for a pool to count as fee-earning
    pub fee_threshold_usd: f64,

    /// Progress cadence for transaction-driven stages
    pub tx_progress_interval: usize,

    /// Progress cadence for the fee aggregation stage
    pub pool_progress_interval: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            signature_limit: 1000,
            fee_threshold_usd: 0.01,
            tx_progress_interval: 5,
            pool_progress_interval: 2,
        }
    }
}

/// Ordered queue of wallets awaiting analysis
///
/// Wallets are analyzed strictly in submission order, one at a time.
/// Duplicate submissions keep their first position.
#[derive(Debug, Clone, Default)]
pub struct WalletQueue {
    wallets: Vec<String>,
}

impl WalletQueue {
    /// Parse a whitespace-separated wallet list into a queue
    pub fn from_input(input: &str) -> Self {
        let mut wallets: Vec<String> = Vec::new();
        for wallet in validation::split_wallet_list(input) {
            if !wallets.contains(&wallet) {
                wallets.push(wallet);
            }
        }
        Self { wallets }
    }

    /// Build a queue from an already-split wallet list
    pub fn from_wallets<I, S>(wallets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_input(
            &wallets
                .into_iter()
                .map(Into::into)
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn wallets(&self) -> &[String] {
        &self.wallets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.wallets.iter()
    }
}

/// Per-wallet analysis pipeline
pub struct WalletAnalyzer {
    assets: Arc<dyn AssetSource>,
    fees: Arc<dyn FeeSource>,
    blacklist: Arc<Blacklist>,
    settings: AnalyzerSettings,
}

impl WalletAnalyzer {
    pub fn new(
        assets: Arc<dyn AssetSource>,
        fees: Arc<dyn FeeSource>,
        blacklist: Arc<Blacklist>,
        settings: AnalyzerSettings,
    ) -> Self {
        Self {
            assets,
            fees,
            blacklist,
            settings,
        }
    }

    /// Run the full pipeline for one wallet
    ///
    /// Always produces a metrics record. External failures are logged and
    /// leave the affected fields at their defaults.
    pub async fn analyze(
        &self,
        transactions: &dyn TransactionSource,
        wallet: &str,
        sink: &dyn ProgressSink,
    ) -> AppResult<WalletMetrics> {
        let tracker = TaskTracker::new();
        tracker.start()?;

        let mut metrics = WalletMetrics::new(wallet);

        // Stage 1: blacklist
        sink.report(&TaskProgress::stage_only(wallet, AnalysisStage::Blacklist))
            .await;
        metrics.blacklist = self.blacklist.contains(wallet);

        // Stage 2: LP Army certificate
        sink.report(&TaskProgress::stage_only(
            wallet,
            AnalysisStage::Certificate,
        ))
        .await;
        metrics.cnft = match self.assets.assets_for_owner(wallet).await {
            Ok(assets) => certificate::holds_certificate(&assets),
            Err(e) => {
                warn!(wallet, error = %e, "Certificate check failed, assuming no certificate");
                false
            }
        };

        // The on-chain stages need a syntactically valid address
        if validation::validate_wallet_address(wallet).is_err() {
            warn!(wallet, "Invalid wallet address, skipping on-chain stages");
            tracker.fail()?;
            return Ok(metrics);
        }

        // Stage 3: signature history
        sink.report(&TaskProgress::stage_only(wallet, AnalysisStage::History))
            .await;
        let records = match history::fetch_history(
            transactions,
            wallet,
            self.settings.signature_limit,
        )
        .await
        {
            Ok(records) => records,
            Err(e) => {
                warn!(wallet, error = %e, "History fetch failed, skipping on-chain stages");
                tracker.fail()?;
                return Ok(metrics);
            }
        };

        // Stage 4: DLMM program filter
        let matched = history::filter_program_transactions(
            transactions,
            sink,
            wallet,
            &records,
            METEORA_DLMM_PROGRAM,
            self.settings.tx_progress_interval,
        )
        .await?;

        // Stage 5: activity metrics
        let summary = activity::summarize(&matched);
        metrics.first_tx = summary.first_tx;
        metrics.active_weeks = summary.active_weeks;
        metrics.active_months = summary.active_months;

        // Stage 6: pool extraction
        let pool_addresses = pools::extract_pools(
            sink,
            wallet,
            &matched,
            self.settings.tx_progress_interval,
        )
        .await;

        // Stage 7: fee aggregation
        let fee_summary = pools::aggregate_fees(
            self.fees.as_ref(),
            sink,
            wallet,
            &pool_addresses,
            self.settings.fee_threshold_usd,
            self.settings.pool_progress_interval,
        )
        .await?;
        metrics.total_fees = fee_summary.total_fees;
        metrics.pools_with_fees = fee_summary.pools_with_fees;

        tracker.complete()?;
        info!(
            wallet,
            total_fees = metrics.total_fees,
            pools_with_fees = metrics.pools_with_fees,
            active_weeks = metrics.active_weeks,
            active_months = metrics.active_months,
            cnft = metrics.cnft,
            blacklist = metrics.blacklist,
            "Wallet analysis finished"
        );
        Ok(metrics)
    }

    /// Analyze every wallet in the queue, in order
    ///
    /// A wallet whose pipeline errors out still yields a defaults record so
    /// the report covers every submitted wallet.
    pub async fn analyze_queue(
        &self,
        transactions: &dyn TransactionSource,
        queue: &WalletQueue,
        sink: &dyn ProgressSink,
    ) -> Vec<WalletMetrics> {
        let mut results = Vec::with_capacity(queue.len());

        for (index, wallet) in queue.iter().enumerate() {
            info!(
                wallet = %wallet,
                position = index + 1,
                total = queue.len(),
                "Analyzing wallet"
            );
            let metrics = match self.analyze(transactions, wallet, sink).await {
                Ok(metrics) => metrics,
                Err(e) => {
                    warn!(wallet = %wallet, error = %e, "Wallet analysis failed");
                    WalletMetrics::new(wallet.clone())
                }
            };
            results.push(metrics);
        }

        results
    }
}
