//! Core domain layer containing errors and value objects
//!
//! This module defines the fundamental building blocks of the wallet
//! analyzer domain: the error system and the types flowing through the
//! per-wallet analysis pipeline. It must stay independent of the front
//! ends and the external API clients.

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, AppResult, ErrorKind};
pub use types::*;
