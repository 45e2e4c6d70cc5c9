//! Application error types and error handling utilities
//!
//! This module defines a structured error system for the Meteora wallet
//! analyzer: error types per subsystem, constructor helpers, and the
//! retry classification used by the external API clients.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main application error type that encompasses all possible errors
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<AppError>>,
    },

    /// Network and HTTP transport errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        endpoint: Option<String>,
        #[source]
        source: Option<Box<AppError>>,
    },

    /// Solana RPC errors
    #[error("RPC error: {message}")]
    Rpc {
        message: String,
        signature: Option<String>,
        #[source]
        source: Option<Box<AppError>>,
    },

    /// External REST/JSON-RPC service errors (Helius DAS, Meteora fee API)
    #[error("External service error: {service} - {message}")]
    ExternalService {
        service: String,
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<Box<AppError>>,
    },

    /// Telegram bot errors
    #[error("Telegram error: {message}")]
    Telegram {
        message: String,
        chat_id: Option<i64>,
        #[source]
        source: Option<Box<AppError>>,
    },

    /// Validation errors (wallet addresses, config fields)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        value: Option<String>,
    },

    /// Report generation and file I/O errors
    #[error("Report error: {message}")]
    Report {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<AppError>>,
    },

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        component: Option<String>,
        #[source]
        source: Option<Box<AppError>>,
    },
}

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Configuration and setup errors
    Configuration,
    /// Network, RPC and external service errors
    Network,
    /// Front-end integration errors
    Integration,
    /// Validation and input errors
    Validation,
    /// Report output errors
    Output,
    /// System and infrastructure errors
    System,
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            endpoint: None,
            source: None,
        }
    }

    /// Create a new network error tagged with the endpoint that failed
    pub fn network_at<S: Into<String>, E: Into<String>>(message: S, endpoint: E) -> Self {
        Self::Network {
            message: message.into(),
            endpoint: Some(endpoint.into()),
            source: None,
        }
    }

    /// Create a new RPC error
    pub fn rpc<S: Into<String>>(message: S) -> Self {
        Self::Rpc {
            message: message.into(),
            signature: None,
            source: None,
        }
    }

    /// Create a new RPC error tied to a transaction signature
    pub fn rpc_for_signature<S: Into<String>, G: Into<String>>(message: S, signature: G) -> Self {
        Self::Rpc {
            message: message.into(),
            signature: Some(signature.into()),
            source: None,
        }
    }

    /// Create a new external service error
    pub fn external<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create a new external service error carrying the HTTP status
    pub fn external_status<S: Into<String>, M: Into<String>>(service: S, message: M, status: u16) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new Telegram error
    pub fn telegram<S: Into<String>>(message: S) -> Self {
        Self::Telegram {
            message: message.into(),
            chat_id: None,
            source: None,
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
            value: None,
        }
    }

    /// Create a new validation error for a named field/value pair
    pub fn validation_for<S: Into<String>, F: Into<String>, V: Into<String>>(
        message: S,
        field: F,
        value: V,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
            value: Some(value.into()),
        }
    }

    /// Create a new report error
    pub fn report<S: Into<String>>(message: S) -> Self {
        Self::Report {
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
            component: None,
            source: None,
        }
    }

    /// Create a new internal error tagged with the component that failed
    pub fn internal_in<S: Into<String>, C: Into<String>>(message: S, component: C) -> Self {
        Self::Internal {
            message: message.into(),
            component: Some(component.into()),
            source: None,
        }
    }

    /// Get the error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Configuration,
            Self::Network { .. } | Self::Rpc { .. } | Self::ExternalService { .. } => {
                ErrorKind::Network
            }
            Self::Telegram { .. } => ErrorKind::Integration,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Report { .. } => ErrorKind::Output,
            Self::Internal { .. } => ErrorKind::System,
        }
    }

    /// Check if this error is retryable
    ///
    /// Only the asset-ownership lookup actually retries; everywhere else
    /// the pipeline logs and skips the failed item.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::ExternalService { .. } | Self::Rpc { .. }
        )
    }

    /// Add source error
    pub fn with_source(mut self, source: AppError) -> Self {
        match &mut self {
            Self::Config { source: s, .. }
            | Self::Network { source: s, .. }
            | Self::Rpc { source: s, .. }
            | Self::ExternalService { source: s, .. }
            | Self::Telegram { source: s, .. }
            | Self::Report { source: s, .. }
            | Self::Internal { source: s, .. } => {
                *s = Some(Box::new(source));
            }
            Self::Validation { .. } => {}
        }
        self
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::validation(format!("JSON deserialization error: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(format!("IO error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::network(format!("HTTP request error: {}", err))
    }
}

impl From<solana_client::client_error::ClientError> for AppError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        Self::rpc(err.to_string())
    }
}

impl From<teloxide::RequestError> for AppError {
    fn from(err: teloxide::RequestError) -> Self {
        Self::telegram(format!("Telegram API request failed: {}", err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        Self::report(format!("CSV error: {}", err))
    }
}

/// Result type alias for the application
pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = AppError::config("missing RPC endpoint list");
        assert!(matches!(error, AppError::Config { .. }));
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_error_with_source() {
        let source = AppError::network("connection refused");
        let error = AppError::external("helius", "asset search failed").with_source(source);

        if let AppError::ExternalService { source, .. } = &error {
            assert!(source.is_some());
        } else {
            panic!("expected external service error");
        }
    }

    #[test]
    fn test_retry_classification() {
        assert!(AppError::network("timeout").is_retryable());
        assert!(AppError::external("meteora", "503").is_retryable());
        assert!(!AppError::validation("bad address").is_retryable());
        assert!(!AppError::report("disk full").is_retryable());
    }

    #[test]
    fn test_rpc_error_carries_signature() {
        let error = AppError::rpc_for_signature("fetch failed", "5Nf3sig");
        if let AppError::Rpc { signature, .. } = &error {
            assert_eq!(signature.as_deref(), Some("5Nf3sig"));
        } else {
            panic!("expected rpc error");
        }
    }
}
