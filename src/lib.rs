//! Meteora Wallet Analyzer Library
//!
//! Core library for analyzing Solana wallet engagement with the Meteora
//! DLMM protocol: claimed fees, pool coverage, activity history, LP Army
//! certificate ownership and blacklist status.
//!
//! # Architecture Overview
//!
//! The library is organized in layers:
//!
//! - **Core**: domain types, protocol constants and the error system
//! - **Config**: layered configuration loading and validation
//! - **Services**: external API clients (Solana RPC, Helius DAS, Meteora
//!   DLMM), the per-wallet analysis pipeline and the report renderers
//! - **Telegram**: the interactive bot front end
//! - **Application**: service wiring and the CLI/bot run modes
//!
//! # Usage
//!
//! ```rust,no_run
//! use meteora_wallet_analyzer::{
//!     application::Application,
//!     config::ConfigLoader,
//!     core::types::OutputFormat,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::new().load()?;
//!     let app = Application::build(config).await?;
//!     let wallets = vec!["LBUZKhRxPF3XUpBCjp4YzTKgLccjZhTSDM9YuVaPwxo".to_string()];
//!     app.run_cli(&wallets, OutputFormat::Text).await?;
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod config;
pub mod core;
pub mod services;
pub mod telegram;
pub mod utils;

// Re-export the most commonly used types
pub use application::Application;
pub use config::{AppConfig, ConfigLoader};
pub use crate::core::error::{AppError, AppResult};
pub use crate::core::types::{OutputFormat, WalletMetrics};
pub use services::analyzer::{WalletAnalyzer, WalletQueue};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
