//! Configuration management module
//!
//! Layered configuration loading (defaults, file, environment, CLI) with
//! validation before startup.

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{load_config, load_config_with_args, ConfigLoader};
pub use models::AppConfig;
pub use validation::{ConfigValidator, ValidationResult};
