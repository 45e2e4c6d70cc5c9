//! Configuration loading with support for multiple sources
//!
//! Configuration is resolved in layers: built-in defaults, then an optional
//! TOML file, then environment variables, then CLI arguments. Endpoint pools
//! (Solana RPC URLs and Helius API keys) additionally load from line-delimited
//! text files so that operators can rotate keys without touching the config.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::error::{AppError, AppResult};
use crate::utils::CliArgs;
use super::models::AppConfig;

/// Configuration loader with support for multiple sources
pub struct ConfigLoader {
    /// Path to the configuration file
    config_path: Option<PathBuf>,

    /// CLI arguments for overrides
    cli_args: Option<CliArgs>,

    /// Whether environment variables are applied
    use_env: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            cli_args: None,
            use_env: true,
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set CLI arguments for configuration overrides
    pub fn with_cli_args(mut self, args: CliArgs) -> Self {
        self.cli_args = Some(args);
        self
    }

    /// Disable environment variable overrides (used in tests)
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Load the complete application configuration
    pub fn load(&self) -> AppResult<AppConfig> {
        debug!("Loading application configuration");

        if self.use_env {
            // Load .env if present; missing files are fine
            if dotenvy::dotenv().is_ok() {
                debug!("Loaded environment from .env file");
            }
        }

        let mut config = match self.resolve_config_path() {
            Some(path) => Self::load_from_file(&path)?,
            None => {
                debug!("No configuration file found, using defaults");
                AppConfig::default()
            }
        };

        if self.use_env {
            self.apply_env_overrides(&mut config);
        }

        if let Some(args) = &self.cli_args {
            Self::apply_cli_overrides(&mut config, args);
        }

        self.resolve_endpoint_pools(&mut config)?;

        info!(
            environment = %config.environment.name,
            rpc_endpoints = config.solana.rpc_urls.len(),
            helius_keys = config.helius.api_keys.len(),
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Parse a TOML configuration file
    fn load_from_file(path: &Path) -> AppResult<AppConfig> {
        debug!("Loading configuration from {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            AppError::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Resolve the configuration file path from the explicit setting,
    /// the environment, or the default search locations
    fn resolve_config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            return Some(path.clone());
        }

        if self.use_env {
            if let Ok(path) = env::var("ANALYZER_CONFIG") {
                return Some(PathBuf::from(path));
            }
        }

        let default_paths = ["config.toml", "config/config.toml"];
        for candidate in default_paths {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&self, config: &mut AppConfig) {
        if let Ok(token) = env::var("TELEGRAM_TOKEN") {
            config.telegram.bot_token = token;
        }
        if let Ok(level) = env::var("LOG_LEVEL") {
            config.environment.log_level = level;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            config.environment.log_format = format;
        }
        if let Ok(name) = env::var("ENVIRONMENT") {
            config.environment.name = name;
        }
        if let Ok(file) = env::var("BLACKLIST_FILE") {
            config.blacklist.file = file;
        }
    }

    /// Apply CLI argument overrides, only for flags that were actually given
    fn apply_cli_overrides(config: &mut AppConfig, args: &CliArgs) {
        if let Some(level) = &args.log_level {
            config.environment.log_level = level.clone();
        }
        if let Some(format) = &args.log_format {
            config.environment.log_format = format.clone();
        }
    }

    /// Fill the RPC endpoint and Helius key pools from their list files,
    /// falling back to environment variables
    fn resolve_endpoint_pools(&self, config: &mut AppConfig) -> AppResult<()> {
        if config.solana.rpc_urls.is_empty() {
            config.solana.rpc_urls = self.load_endpoint_list(
                &config.solana.rpc_url_file,
                "RPC_URL",
            );
        }
        if config.solana.rpc_urls.is_empty() {
            return Err(AppError::config(format!(
                "No Solana RPC endpoints configured: provide '{}' or set RPC_URL",
                config.solana.rpc_url_file
            )));
        }

        if config.helius.api_keys.is_empty() {
            config.helius.api_keys = self.load_endpoint_list(
                &config.helius.api_key_file,
                "HELIUS_API_KEY",
            );
        }
        if config.helius.api_keys.is_empty() {
            warn!(
                "No Helius API keys configured: certificate checks will be skipped \
                 (provide '{}' or set HELIUS_API_KEY)",
                config.helius.api_key_file
            );
        }

        Ok(())
    }

    /// Read a line-delimited endpoint file, skipping blanks and `#` comments.
    /// When the file does not exist the named environment variable is used
    /// instead, split on commas and whitespace.
    fn load_endpoint_list(&self, file: &str, env_var: &str) -> Vec<String> {
        match fs::read_to_string(file) {
            Ok(content) => content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string)
                .collect(),
            Err(_) => {
                if !self.use_env {
                    return Vec::new();
                }
                env::var(env_var)
                    .map(|value| {
                        value
                            .split(|c: char| c == ',' || c.is_whitespace())
                            .map(str::trim)
                            .filter(|part| !part.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default()
            }
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration with default settings
pub fn load_config() -> AppResult<AppConfig> {
    ConfigLoader::new().load()
}

/// Load configuration with CLI argument overrides
pub fn load_config_with_args(args: CliArgs) -> AppResult<AppConfig> {
    let mut loader = ConfigLoader::new().with_cli_args(args.clone());
    if let Some(path) = &args.config_path {
        loader = loader.with_config_path(path);
    }
    loader.load()
}
