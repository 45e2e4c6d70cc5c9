//! Main application structure and lifecycle management
//!
//! Wires the configuration into the service graph (endpoint pools, API
//! clients, blacklist, analyzer) and exposes the two run modes: a one-shot
//! CLI batch and the long-running Telegram bot.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use teloxide::Bot;
use tracing::{info, instrument, warn};

use crate::config::AppConfig;
use crate::core::error::{AppError, AppResult};
use crate::core::types::OutputFormat;
use crate::services::analyzer::{
    AnalyzerSettings, Blacklist, LogProgressSink, WalletAnalyzer, WalletQueue,
};
use crate::services::endpoints::EndpointRotator;
use crate::services::helius::{AssetSource, HeliusClient};
use crate::services::meteora::MeteoraClient;
use crate::services::report;
use crate::services::solana::SolanaRpcClient;
use crate::telegram::bot::{self, BotContext};

/// Asset source used when no Helius API keys are configured
///
/// Every lookup fails, which the pipeline degrades to "no certificate".
struct DisabledAssetSource;

#[async_trait]
impl AssetSource for DisabledAssetSource {
    async fn assets_for_owner(&self, _wallet: &str) -> AppResult<Vec<Value>> {
        Err(AppError::external(
            "helius",
            "No Helius API keys configured",
        ))
    }
}

/// Main application coordinator
pub struct Application {
    config: Arc<AppConfig>,
    analyzer: Arc<WalletAnalyzer>,
    rpc_pool: Arc<EndpointRotator>,
}

impl Application {
    /// Build the service graph from a validated configuration
    #[instrument(skip(config))]
    pub async fn build(config: AppConfig) -> AppResult<Self> {
        info!("Building application instance");

        let validation = config.validate()?;
        if !validation.is_valid {
            return Err(AppError::config(format!(
                "Configuration validation failed: {:?}",
                validation.errors
            )));
        }
        for warning in &validation.warnings {
            warn!("Configuration warning: {}", warning);
        }

        let rpc_pool = Arc::new(EndpointRotator::new(config.solana.rpc_urls.clone())?);

        let assets: Arc<dyn AssetSource> = if config.helius.api_keys.is_empty() {
            Arc::new(DisabledAssetSource)
        } else {
            let key_pool = Arc::new(EndpointRotator::new(config.helius.api_keys.clone())?);
            Arc::new(HeliusClient::new(
                config.helius.base_url.clone(),
                key_pool,
                config.helius.request_timeout_secs,
                config.helius.max_retries,
                config.helius.page_limit,
            )?)
        };

        let fees = Arc::new(MeteoraClient::new(
            config.meteora.base_url.clone(),
            config.meteora.request_timeout_secs,
        )?);

        let blacklist = Arc::new(Blacklist::load(&config.blacklist.file)?);

        let settings = AnalyzerSettings {
            signature_limit: config.solana.signature_limit,
            fee_threshold_usd: config.meteora.fee_threshold_usd,
            tx_progress_interval: config.analyzer.tx_progress_interval,
            pool_progress_interval: config.analyzer.pool_progress_interval,
        };

        let analyzer = Arc::new(WalletAnalyzer::new(assets, fees, blacklist, settings));

        info!("Application instance built");
        Ok(Self {
            config: Arc::new(config),
            analyzer,
            rpc_pool,
        })
    }

    /// Run one analysis batch and print/write the reports
    pub async fn run_cli(&self, wallets: &[String], format: OutputFormat) -> AppResult<()> {
        let queue = WalletQueue::from_wallets(wallets.iter().cloned());
        if queue.is_empty() {
            return Err(AppError::validation(
                "No wallet addresses given, pass them as arguments",
            ));
        }

        info!(wallets = queue.len(), %format, "Starting CLI analysis");

        let endpoint = self.rpc_pool.next();
        let rpc = SolanaRpcClient::new(
            endpoint,
            &self.config.solana.commitment,
            self.config.solana.connection_timeout_ms,
        );

        let results = self
            .analyzer
            .analyze_queue(&rpc, &queue, &LogProgressSink)
            .await;

        if format.wants_text() {
            println!("{}", report::format_text_report(&results));
        }

        if format.wants_csv() {
            let path = report::write_csv_report(
                &results,
                Path::new(&self.config.report.output_dir),
            )?;
            println!("CSV report saved as {}", path.display());
        }

        Ok(())
    }

    /// Run the Telegram bot until shutdown
    pub async fn run_bot(&self) -> AppResult<()> {
        if !self.config.has_bot_token() {
            return Err(AppError::config(
                "Bot mode requires telegram.bot_token (or TELEGRAM_TOKEN)",
            ));
        }

        let telegram_bot = Bot::new(&self.config.telegram.bot_token);
        let context = Arc::new(BotContext::new(
            self.analyzer.clone(),
            self.rpc_pool.clone(),
            &self.config,
        ));

        bot::run(telegram_bot, context).await;
        info!("Telegram bot stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.solana.rpc_urls = vec!["https://rpc.example.com".to_string()];
        config.helius.api_keys = vec!["test-key".to_string()];
        config.blacklist.file = "does-not-exist.csv".to_string();
        config
    }

    #[tokio::test]
    async fn test_build_with_valid_config() {
        let app = Application::build(test_config()).await.unwrap();
        assert_eq!(app.rpc_pool.len(), 1);
    }

    #[tokio::test]
    async fn test_build_rejects_invalid_config() {
        let mut config = test_config();
        config.solana.rpc_urls.clear();
        assert!(Application::build(config).await.is_err());
    }

    #[tokio::test]
    async fn test_bot_mode_requires_token() {
        let app = Application::build(test_config()).await.unwrap();
        assert!(app.run_bot().await.is_err());
    }

    #[tokio::test]
    async fn test_cli_requires_wallets() {
        let app = Application::build(test_config()).await.unwrap();
        let result = app.run_cli(&[], OutputFormat::Text).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_disabled_asset_source_errors() {
        let source = DisabledAssetSource;
        assert!(source.assets_for_owner("wallet").await.is_err());
    }
}
