//! Helius DAS API client
//!
//! Fetches the compressed NFT inventory of a wallet through the
//! `getAssetsByOwner` DAS method. Requests retry with a linear backoff and
//! rotate to the next API key in the pool between attempts, so a rate-limited
//! or dead key does not sink the whole lookup.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::core::error::{AppError, AppResult};
use super::endpoints::EndpointRotator;

/// Source of wallet asset inventories
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// All DAS assets owned by a wallet (first page, up to the page limit)
    async fn assets_for_owner(&self, wallet: &str) -> AppResult<Vec<Value>>;
}

/// Helius DAS API client with key rotation
pub struct HeliusClient {
    http: reqwest::Client,
    base_url: String,
    api_keys: Arc<EndpointRotator>,
    max_retries: u32,
    page_limit: u32,
}

impl HeliusClient {
    pub fn new(
        base_url: impl Into<String>,
        api_keys: Arc<EndpointRotator>,
        timeout_secs: u64,
        max_retries: u32,
        page_limit: u32,
    ) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::internal_in(format!("Failed to build HTTP client: {}", e), "helius"))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_keys,
            max_retries: max_retries.max(1),
            page_limit,
        })
    }

    /// Delay before the given retry attempt (1-based)
    fn retry_delay(attempt: u32) -> Duration {
        Duration::from_secs(2 * attempt as u64)
    }

    async fn fetch_assets_once(&self, wallet: &str, api_key: &str) -> AppResult<Vec<Value>> {
        let url = format!("{}/?api-key={}", self.base_url, api_key);
        let body = json!({
            "jsonrpc": "2.0",
            "id": "cnft-check",
            "method": "getAssetsByOwner",
            "params": {
                "ownerAddress": wallet,
                "page": 1,
                "limit": self.page_limit,
            }
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::external("helius", format!("Helius request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_status(
                "helius",
                format!("Helius returned HTTP {}", status),
                status.as_u16(),
            ));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::external("helius", format!("Invalid Helius response: {}", e)))?;

        if let Some(error) = payload.get("error") {
            return Err(AppError::external(
                "helius",
                format!("Helius RPC error: {}", error),
            ));
        }

        let items = payload
            .get("result")
            .and_then(|result| result.get("items"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(items)
    }
}

#[async_trait]
impl AssetSource for HeliusClient {
    async fn assets_for_owner(&self, wallet: &str) -> AppResult<Vec<Value>> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            let api_key = self.api_keys.next();

            match self.fetch_assets_once(wallet, &api_key).await {
                Ok(assets) => {
                    debug!(wallet, count = assets.len(), attempt, "Fetched DAS assets");
                    return Ok(assets);
                }
                Err(e) => {
                    warn!(
                        wallet,
                        attempt,
                        max_retries = self.max_retries,
                        error = %e,
                        "DAS asset fetch failed"
                    );
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        tokio::time::sleep(Self::retry_delay(attempt)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AppError::external("helius", "DAS asset fetch failed with no attempts made")
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn keys(list: &[&str]) -> Arc<EndpointRotator> {
        Arc::new(
            EndpointRotator::new(list.iter().map(|k| k.to_string()).collect()).unwrap(),
        )
    }

    fn client(server: &MockServer, api_keys: Arc<EndpointRotator>, max_retries: u32) -> HeliusClient {
        HeliusClient::new(server.uri(), api_keys, 5, max_retries, 1000).unwrap()
    }

    #[test]
    fn test_retry_delay_is_linear() {
        assert_eq!(HeliusClient::retry_delay(1), Duration::from_secs(2));
        assert_eq!(HeliusClient::retry_delay(2), Duration::from_secs(4));
        assert_eq!(HeliusClient::retry_delay(3), Duration::from_secs(6));
    }

    #[tokio::test]
    async fn test_fetch_assets() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(query_param("api-key", "key-1"))
            .and(body_partial_json(json!({
                "method": "getAssetsByOwner",
                "params": { "ownerAddress": "SomeWallet", "page": 1, "limit": 1000 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "result": { "items": [ { "id": "asset-1" }, { "id": "asset-2" } ] }
            })))
            .mount(&server)
            .await;

        let client = client(&server, keys(&["key-1"]), 1);
        let assets = client.assets_for_owner("SomeWallet").await.unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0]["id"], "asset-1");
    }

    #[tokio::test]
    async fn test_missing_items_yields_empty_list() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "result": {}
            })))
            .mount(&server)
            .await;

        let client = client(&server, keys(&["key-1"]), 1);
        let assets = client.assets_for_owner("SomeWallet").await.unwrap();
        assert!(assets.is_empty());
    }

    #[tokio::test]
    async fn test_rpc_error_payload_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "error": { "code": -32600, "message": "Invalid request" }
            })))
            .mount(&server)
            .await;

        let client = client(&server, keys(&["key-1"]), 1);
        assert!(client.assets_for_owner("SomeWallet").await.is_err());
    }

    #[tokio::test]
    async fn test_retries_rotate_api_keys() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(query_param("api-key", "key-1"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(query_param("api-key", "key-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "result": { "items": [ { "id": "asset-1" } ] }
            })))
            .mount(&server)
            .await;

        let client = client(&server, keys(&["key-1", "key-2"]), 2);
        let assets = client.assets_for_owner("SomeWallet").await.unwrap();
        assert_eq!(assets.len(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_retries_returns_last_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client(&server, keys(&["key-1"]), 1);
        let error = client.assets_for_owner("SomeWallet").await.unwrap_err();
        assert!(error.is_retryable());
    }
}
