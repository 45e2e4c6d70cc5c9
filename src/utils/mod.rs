//! Utility functions and helpers used throughout the application
//!
//! This module provides common utility functions for time handling,
//! validation, telemetry and command-line parsing.

pub mod time;
pub mod validation;

// Re-export commonly used utilities
pub use time::*;
pub use validation::*;

/// Telemetry and observability utilities
pub mod telemetry {
    use color_eyre::eyre::Result;
    use tracing_appender::non_blocking::WorkerGuard;
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{
        fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
    };

    /// Initialize global tracing with the specified log level and format
    pub fn init(log_level: &str, log_format: &str) -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        let registry = Registry::default().with(env_filter);

        match log_format {
            "json" => {
                registry
                    .with(
                        fmt::layer()
                            .json()
                            .with_target(true)
                            .with_file(true)
                            .with_line_number(true),
                    )
                    .init();
            }
            "compact" => {
                registry
                    .with(fmt::layer().compact().with_target(false))
                    .init();
            }
            _ => {
                registry.with(fmt::layer().pretty().with_target(true)).init();
            }
        }

        Ok(())
    }

    /// Initialize tracing that also writes daily-rotated files
    ///
    /// The returned guard must stay alive for the duration of the process
    /// or buffered log lines are lost on shutdown.
    pub fn init_with_file(
        log_level: &str,
        log_format: &str,
        log_directory: &str,
        file_name_prefix: &str,
    ) -> Result<WorkerGuard> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, log_directory, file_name_prefix);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let registry = Registry::default().with(env_filter);

        match log_format {
            "json" => {
                registry
                    .with(
                        fmt::layer()
                            .json()
                            .with_writer(non_blocking)
                            .with_target(true),
                    )
                    .with(fmt::layer().pretty().with_target(true))
                    .init();
            }
            _ => {
                registry
                    .with(fmt::layer().with_writer(non_blocking).with_target(true))
                    .with(fmt::layer().pretty().with_target(true))
                    .init();
            }
        }

        Ok(guard)
    }
}

/// Command-line argument parsing utilities
pub mod cli {
    use clap::Parser;

    /// Command line arguments for the analyzer
    #[derive(Parser, Debug, Clone)]
    #[command(
        name = "meteora-analyzer",
        about = "Solana wallet engagement analyzer for the Meteora DLMM protocol",
        version = env!("CARGO_PKG_VERSION"),
    )]
    pub struct CliArgs {
        /// Wallet addresses to analyze (omit when running as a bot)
        #[arg(value_name = "WALLET")]
        pub wallets: Vec<String>,

        /// Report output format (text, csv, all)
        #[arg(short, long, default_value = "text", env = "OUTPUT_FORMAT")]
        pub format: String,

        /// Run the Telegram bot instead of a one-shot CLI analysis
        #[arg(long, env = "RUN_BOT")]
        pub bot: bool,

        /// Path to configuration file
        #[arg(short, long, env = "CONFIG_PATH")]
        pub config_path: Option<String>,

        /// Logging level (trace, debug, info, warn, error)
        #[arg(short, long, env = "LOG_LEVEL")]
        pub log_level: Option<String>,

        /// Log format (json, pretty, compact)
        #[arg(long, env = "LOG_FORMAT")]
        pub log_format: Option<String>,

        /// Directory for rotated log files (console-only when unset)
        #[arg(long, env = "LOG_DIR")]
        pub log_dir: Option<String>,
    }
}

// Re-export CLI utilities
pub use cli::CliArgs;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_defaults() {
        use clap::Parser;

        let args = CliArgs::parse_from(["meteora-analyzer", "wallet1", "wallet2"]);
        assert_eq!(args.wallets.len(), 2);
        assert_eq!(args.format, "text");
        assert!(!args.bot);
        // Logging flags stay unset so file/env configuration can win
        assert!(args.log_level.is_none());
        assert!(args.log_format.is_none());
    }

    #[test]
    fn test_cli_args_bot_mode() {
        use clap::Parser;

        let args = CliArgs::parse_from(["meteora-analyzer", "--bot", "--format", "csv"]);
        assert!(args.bot);
        assert!(args.wallets.is_empty());
        assert_eq!(args.format, "csv");
    }
}
