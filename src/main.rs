//! Meteora Wallet Analyzer
//!
//! Analyzes Solana wallets for Meteora DLMM engagement: total claimed fees,
//! fee-earning pools, first transaction date, active weeks/months, LP Army
//! certificate ownership and blacklist status. Runs either as a one-shot
//! CLI batch or as an interactive Telegram bot.

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::process;

use meteora_wallet_analyzer::{
    application::Application,
    config::{AppConfig, ConfigLoader},
    core::types::OutputFormat,
    utils::{telemetry, CliArgs},
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = color_eyre::install() {
        eprintln!("Failed to install color-eyre: {}", e);
        process::exit(1);
    }

    if let Err(e) = run().await {
        error!("Fatal application error: {:?}", e);

        eprintln!("\n❌ Application failed:");
        for (depth, cause) in e.chain().enumerate() {
            if depth == 0 {
                eprintln!("   {}", cause);
            } else {
                eprintln!("   Caused by: {}", cause);
            }
        }

        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli_args = CliArgs::parse();

    let config = load_config(&cli_args).wrap_err("Configuration loading failed")?;

    // Logging settings come from the merged configuration, so file and
    // environment values apply unless a CLI flag overrides them.
    // The guard flushes buffered file logs on drop, keep it for the whole run
    let log_level = &config.environment.log_level;
    let log_format = &config.environment.log_format;
    let _log_guard = match &cli_args.log_dir {
        Some(dir) => Some(
            telemetry::init_with_file(log_level, log_format, dir, "analyzer")
                .wrap_err("Failed to initialize file logging")?,
        ),
        None => {
            telemetry::init(log_level, log_format)
                .wrap_err("Failed to initialize telemetry")?;
            None
        }
    };

    info!("Meteora Wallet Analyzer v{}", env!("CARGO_PKG_VERSION"));

    if config.is_development() {
        warn!("Running in development mode");
    }

    let app = Application::build(config)
        .await
        .wrap_err("Application initialization failed")?;

    if cli_args.bot {
        info!("Running in Telegram bot mode");
        app.run_bot().await.wrap_err("Bot runtime error")?;
    } else {
        let format: OutputFormat = cli_args
            .format
            .parse()
            .wrap_err("Invalid output format, use text, csv or all")?;
        app.run_cli(&cli_args.wallets, format)
            .await
            .wrap_err("Analysis failed")?;
    }

    Ok(())
}

fn load_config(cli_args: &CliArgs) -> Result<AppConfig> {
    let mut loader = ConfigLoader::new().with_cli_args(cli_args.clone());
    if let Some(path) = &cli_args.config_path {
        loader = loader.with_config_path(path);
    }
    loader.load().wrap_err("Failed to load configuration")
}
