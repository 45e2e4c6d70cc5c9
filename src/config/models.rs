//! Configuration data structures and models
//!
//! This module defines the complete configuration structure for the wallet
//! engagement analyzer, covering the Solana RPC layer, the Helius DAS API,
//! the Meteora DLMM fee API, the Telegram bot and the report writer.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Solana blockchain configuration
    #[serde(default)]
    pub solana: SolanaConfig,

    /// Helius DAS API configuration
    #[serde(default)]
    pub helius: HeliusConfig,

    /// Meteora DLMM fee API configuration
    #[serde(default)]
    pub meteora: MeteoraConfig,

    /// Telegram bot configuration
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Analysis pipeline configuration
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Wallet blacklist configuration
    #[serde(default)]
    pub blacklist: BlacklistConfig,

    /// Report output configuration
    #[serde(default)]
    pub report: ReportConfig,
}

/// Environment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Environment name (development, staging, production)
    #[serde(default = "default_environment_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (json, pretty, compact)
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

/// Solana RPC configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolanaConfig {
    /// RPC endpoint pool, rotated per user/task
    #[serde(default)]
    pub rpc_urls: Vec<String>,

    /// Line-delimited file of RPC endpoints, loaded when `rpc_urls` is empty
    #[serde(default = "default_rpc_url_file")]
    pub rpc_url_file: String,

    /// Connection timeout in milliseconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_ms: u64,

    /// Commitment level (processed, confirmed, finalized)
    #[serde(default = "default_commitment")]
    pub commitment: String,

    /// Maximum signatures fetched per wallet
    #[serde(default = "default_signature_limit")]
    pub signature_limit: usize,
}

/// Helius DAS API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeliusConfig {
    /// API key pool, rotated between retry attempts
    #[serde(default)]
    pub api_keys: Vec<String>,

    /// Line-delimited file of API keys, loaded when `api_keys` is empty
    #[serde(default = "default_helius_key_file")]
    pub api_key_file: String,

    /// DAS RPC base URL
    #[serde(default = "default_helius_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_helius_timeout")]
    pub request_timeout_secs: u64,

    /// Retry attempts for the certificate lookup
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Assets fetched per getAssetsByOwner page
    #[serde(default = "default_asset_page_limit")]
    pub page_limit: u32,
}

/// Meteora DLMM fee API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeteoraConfig {
    /// DLMM REST API base URL
    #[serde(default = "default_meteora_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_meteora_timeout")]
    pub request_timeout_secs: u64,

    /// Minimum claimed fee (USD) for a pool to count as fee-earning
    #[serde(default = "default_fee_threshold")]
    pub fee_threshold_usd: f64,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token, required only in bot mode
    #[serde(default)]
    pub bot_token: String,
}

/// Analysis pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Progress is reported every N transactions during program filtering
    #[serde(default = "default_tx_progress_interval")]
    pub tx_progress_interval: usize,

    /// Progress is reported every N pools during fee aggregation
    #[serde(default = "default_pool_progress_interval")]
    pub pool_progress_interval: usize,
}

/// Wallet blacklist configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistConfig {
    /// CSV file with an `address` column of flagged wallets
    #[serde(default = "default_blacklist_file")]
    pub file: String,
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory where CSV reports are written
    #[serde(default = "default_report_dir")]
    pub output_dir: String,
}

// Default value functions for serde

fn default_environment_name() -> String { "development".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }
fn default_rpc_url_file() -> String { "RPC_URL.txt".to_string() }
fn default_connection_timeout() -> u64 { 30_000 }
fn default_commitment() -> String { "confirmed".to_string() }
fn default_signature_limit() -> usize { 1000 }
fn default_helius_key_file() -> String { "HELIUS_API_KEY.txt".to_string() }
fn default_helius_base_url() -> String { "https://mainnet.helius-rpc.com".to_string() }
fn default_helius_timeout() -> u64 { 30 }
fn default_max_retries() -> u32 { 3 }
fn default_asset_page_limit() -> u32 { 1000 }
fn default_meteora_base_url() -> String { "https://dlmm-api.meteora.ag".to_string() }
fn default_meteora_timeout() -> u64 { 15 }
fn default_fee_threshold() -> f64 { 0.01 }
fn default_tx_progress_interval() -> usize { 5 }
fn default_pool_progress_interval() -> usize { 2 }
fn default_blacklist_file() -> String { "kelsier_addresses.csv".to_string() }
fn default_report_dir() -> String { ".".to_string() }

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            name: default_environment_name(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_urls: Vec::new(),
            rpc_url_file: default_rpc_url_file(),
            connection_timeout_ms: default_connection_timeout(),
            commitment: default_commitment(),
            signature_limit: default_signature_limit(),
        }
    }
}

impl Default for HeliusConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            api_key_file: default_helius_key_file(),
            base_url: default_helius_base_url(),
            request_timeout_secs: default_helius_timeout(),
            max_retries: default_max_retries(),
            page_limit: default_asset_page_limit(),
        }
    }
}

impl Default for MeteoraConfig {
    fn default() -> Self {
        Self {
            base_url: default_meteora_base_url(),
            request_timeout_secs: default_meteora_timeout(),
            fee_threshold_usd: default_fee_threshold(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self { bot_token: String::new() }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            tx_progress_interval: default_tx_progress_interval(),
            pool_progress_interval: default_pool_progress_interval(),
        }
    }
}

impl Default for BlacklistConfig {
    fn default() -> Self {
        Self { file: default_blacklist_file() }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { output_dir: default_report_dir() }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: EnvironmentConfig::default(),
            solana: SolanaConfig::default(),
            helius: HeliusConfig::default(),
            meteora: MeteoraConfig::default(),
            telegram: TelegramConfig::default(),
            analyzer: AnalyzerConfig::default(),
            blacklist: BlacklistConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment.name == "development"
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment.name == "production"
    }

    /// Whether the bot token has been provided
    pub fn has_bot_token(&self) -> bool {
        !self.telegram.bot_token.trim().is_empty()
    }
}
