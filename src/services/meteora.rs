//! Meteora DLMM fee API client
//!
//! Queries the public DLMM REST API for the fees a wallet has claimed from a
//! specific pool. The aggregation layer treats a failed lookup as zero fees
//! so one dead pool does not abort a whole wallet analysis.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::core::error::{AppError, AppResult};

/// Source of per-pool claimed fee totals
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeeSource: Send + Sync {
    /// Total USD fees the wallet has claimed from the pool
    async fn claimed_fees_usd(&self, wallet: &str, pool: &str) -> AppResult<f64>;
}

/// Relevant slice of the DLMM earning response
#[derive(Debug, Deserialize)]
struct EarningResponse {
    #[serde(default)]
    total_fee_usd_claimed: f64,
}

/// Meteora DLMM REST API client
pub struct MeteoraClient {
    http: reqwest::Client,
    base_url: String,
}

impl MeteoraClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                AppError::internal_in(format!("Failed to build HTTP client: {}", e), "meteora")
            })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl FeeSource for MeteoraClient {
    async fn claimed_fees_usd(&self, wallet: &str, pool: &str) -> AppResult<f64> {
        let url = format!("{}/wallet/{}/{}/earning", self.base_url, wallet, pool);

        let response = self.http.get(&url).send().await.map_err(|e| {
            AppError::external("meteora", format!("Earning request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_status(
                "meteora",
                format!("Earning endpoint returned HTTP {}", status),
                status.as_u16(),
            ));
        }

        let earning: EarningResponse = response.json().await.map_err(|e| {
            AppError::external("meteora", format!("Invalid earning response: {}", e))
        })?;

        debug!(
            wallet,
            pool,
            fees_usd = earning.total_fee_usd_claimed,
            "Fetched claimed fees"
        );

        Ok(earning.total_fee_usd_claimed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_claimed_fees() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wallet/WalletA/PoolB/earning"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_fee_usd_claimed": 12.34,
                "total_reward_usd_claimed": 0.0
            })))
            .mount(&server)
            .await;

        let client = MeteoraClient::new(server.uri(), 5).unwrap();
        let fees = client.claimed_fees_usd("WalletA", "PoolB").await.unwrap();
        assert!((fees - 12.34).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_missing_fee_field_defaults_to_zero() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_reward_usd_claimed": 1.0
            })))
            .mount(&server)
            .await;

        let client = MeteoraClient::new(server.uri(), 5).unwrap();
        let fees = client.claimed_fees_usd("WalletA", "PoolB").await.unwrap();
        assert_eq!(fees, 0.0);
    }

    #[tokio::test]
    async fn test_http_error_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = MeteoraClient::new(server.uri(), 5).unwrap();
        let error = client.claimed_fees_usd("WalletA", "PoolB").await.unwrap_err();
        assert!(error.is_retryable());
    }
}
