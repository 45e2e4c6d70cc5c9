//! Configuration validation logic
//!
//! Validates configuration values before the application starts, collecting
//! all problems rather than failing on the first one.

use url::Url;
use tracing::{debug, warn};

use crate::core::error::AppResult;
use super::models::AppConfig;

/// Configuration validator
pub struct ConfigValidator {
    /// Strict validation mode (fails on warnings)
    strict_mode: bool,
}

/// Validation result with warnings and errors
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Fatal validation errors
    pub errors: Vec<String>,

    /// Non-fatal warnings
    pub warnings: Vec<String>,

    /// Validation passed
    pub is_valid: bool,
}

impl ConfigValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self { strict_mode: false }
    }

    /// Enable strict validation mode
    pub fn with_strict_mode(mut self) -> Self {
        self.strict_mode = true;
        self
    }

    /// Validate the complete application configuration
    pub fn validate(&self, config: &AppConfig) -> AppResult<ValidationResult> {
        debug!("Starting configuration validation");

        let mut result = ValidationResult {
            errors: Vec::new(),
            warnings: Vec::new(),
            is_valid: true,
        };

        self.validate_environment(config, &mut result);
        self.validate_solana(config, &mut result);
        self.validate_helius(config, &mut result);
        self.validate_meteora(config, &mut result);
        self.validate_analyzer(config, &mut result);

        result.is_valid =
            result.errors.is_empty() && (!self.strict_mode || result.warnings.is_empty());

        if !result.is_valid {
            warn!("Configuration validation failed");
            for error in &result.errors {
                warn!("   Error: {}", error);
            }
            for warning in &result.warnings {
                warn!("   Warning: {}", warning);
            }
        }

        Ok(result)
    }

    fn validate_environment(&self, config: &AppConfig, result: &mut ValidationResult) {
        let env = &config.environment;

        match env.name.as_str() {
            "development" | "staging" | "production" => {}
            other => result.errors.push(format!(
                "Invalid environment '{}'. Must be 'development', 'staging', or 'production'",
                other
            )),
        }

        match env.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => result.errors.push(format!(
                "Invalid log level '{}'. Must be 'trace', 'debug', 'info', 'warn', or 'error'",
                other
            )),
        }

        match env.log_format.as_str() {
            "json" | "pretty" | "compact" => {}
            other => result.errors.push(format!(
                "Invalid log format '{}'. Must be 'json', 'pretty', or 'compact'",
                other
            )),
        }
    }

    fn validate_solana(&self, config: &AppConfig, result: &mut ValidationResult) {
        let solana = &config.solana;

        if solana.rpc_urls.is_empty() {
            result
                .errors
                .push("At least one Solana RPC endpoint is required".to_string());
        }
        for url in &solana.rpc_urls {
            if Url::parse(url).is_err() {
                result
                    .errors
                    .push(format!("Invalid Solana RPC URL '{}'", url));
            }
        }

        match solana.commitment.as_str() {
            "processed" | "confirmed" | "finalized" => {}
            other => result.errors.push(format!(
                "Invalid commitment '{}'. Must be 'processed', 'confirmed', or 'finalized'",
                other
            )),
        }

        if solana.signature_limit == 0 || solana.signature_limit > 1000 {
            result.errors.push(format!(
                "Signature limit {} out of range (1-1000 per RPC call)",
                solana.signature_limit
            ));
        }

        if solana.connection_timeout_ms < 1000 {
            result.warnings.push(format!(
                "Connection timeout {}ms is very low",
                solana.connection_timeout_ms
            ));
        }
    }

    fn validate_helius(&self, config: &AppConfig, result: &mut ValidationResult) {
        let helius = &config.helius;

        if Url::parse(&helius.base_url).is_err() {
            result
                .errors
                .push(format!("Invalid Helius base URL '{}'", helius.base_url));
        }

        if helius.api_keys.is_empty() {
            result
                .warnings
                .push("No Helius API keys configured, certificate checks will fail".to_string());
        }

        if helius.max_retries == 0 {
            result
                .errors
                .push("Helius max_retries must be at least 1".to_string());
        }
    }

    fn validate_meteora(&self, config: &AppConfig, result: &mut ValidationResult) {
        let meteora = &config.meteora;

        if Url::parse(&meteora.base_url).is_err() {
            result
                .errors
                .push(format!("Invalid Meteora base URL '{}'", meteora.base_url));
        }

        if meteora.fee_threshold_usd < 0.0 {
            result.errors.push(format!(
                "Fee threshold {} must not be negative",
                meteora.fee_threshold_usd
            ));
        }
    }

    fn validate_analyzer(&self, config: &AppConfig, result: &mut ValidationResult) {
        let analyzer = &config.analyzer;

        if analyzer.tx_progress_interval == 0 {
            result
                .errors
                .push("tx_progress_interval must be at least 1".to_string());
        }
        if analyzer.pool_progress_interval == 0 {
            result
                .errors
                .push("pool_progress_interval must be at least 1".to_string());
        }
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    /// Validate this configuration with default settings
    pub fn validate(&self) -> AppResult<ValidationResult> {
        ConfigValidator::new().validate(self)
    }

    /// Check if this configuration is valid
    pub fn is_valid(&self) -> bool {
        self.validate().map(|r| r.is_valid).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.solana.rpc_urls = vec!["https://rpc.example.com".to_string()];
        config.helius.api_keys = vec!["test-key".to_string()];
        config
    }

    #[test]
    fn test_valid_config_passes() {
        let result = valid_config().validate().unwrap();
        assert!(result.is_valid, "errors: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_rpc_urls_fails() {
        let mut config = valid_config();
        config.solana.rpc_urls.clear();
        let result = config.validate().unwrap();
        assert!(!result.is_valid);
    }

    #[test]
    fn test_missing_helius_keys_is_a_warning() {
        let mut config = valid_config();
        config.helius.api_keys.clear();

        let result = config.validate().unwrap();
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);

        let strict = ConfigValidator::new()
            .with_strict_mode()
            .validate(&config)
            .unwrap();
        assert!(!strict.is_valid);
    }

    #[test]
    fn test_invalid_commitment_fails() {
        let mut config = valid_config();
        config.solana.commitment = "eventual".to_string();
        assert!(!config.is_valid());
    }

    #[test]
    fn test_signature_limit_bounds() {
        let mut config = valid_config();
        config.solana.signature_limit = 0;
        assert!(!config.is_valid());
        config.solana.signature_limit = 1001;
        assert!(!config.is_valid());
        config.solana.signature_limit = 1000;
        assert!(config.is_valid());
    }
}
