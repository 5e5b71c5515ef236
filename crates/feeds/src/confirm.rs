//! Secondary price-change source used to confirm Solana drops.

use crate::error::FeedError;
use crate::http;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// 5-minute and 1-hour percentage price change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    pub m5: f64,
    pub h1: f64,
}

#[async_trait]
pub trait PriceChangeSource: Send + Sync {
    /// `Ok(None)` when the source has no data for the token.
    async fn price_change(&self, address: &str) -> Result<Option<PriceChange>, FeedError>;
}

#[derive(Debug, Deserialize)]
struct DexToolsResponse {
    #[serde(default)]
    data: Option<DexToolsPrice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DexToolsPrice {
    #[serde(default)]
    variation5m: Option<f64>,
    #[serde(default)]
    variation1h: Option<f64>,
}

fn extract_change(resp: DexToolsResponse) -> Option<PriceChange> {
    let data = resp.data?;
    match (data.variation5m, data.variation1h) {
        (Some(m5), Some(h1)) => Some(PriceChange { m5, h1 }),
        _ => {
            warn!("DexTools: missing price variation in response");
            None
        }
    }
}

/// DexTools public API, Solana token price endpoint.
pub struct DexToolsSource {
    client: Client,
    api_key: String,
}

impl DexToolsSource {
    const BASE_URL: &'static str = "https://public-api.dextools.io/trial/v2/token/solana";

    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl PriceChangeSource for DexToolsSource {
    async fn price_change(&self, address: &str) -> Result<Option<PriceChange>, FeedError> {
        if self.api_key.is_empty() {
            return Err(FeedError::NotConfigured("DEXTOOLS_API_KEY"));
        }

        let url = format!("{}/{}/price", Self::BASE_URL, address);
        let resp: DexToolsResponse = http::get_json(
            &self.client,
            &url,
            &[("accept", "application/json"), ("x-api-key", &self.api_key)],
        )
        .await?;

        let change = extract_change(resp);
        debug!(address, ?change, "DexTools price change");
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Option<PriceChange> {
        extract_change(serde_json::from_str(body).unwrap())
    }

    #[test]
    fn test_extract_change() {
        let change = parse(r#"{"statusCode":200,"data":{"price":0.1,"variation5m":-42.5,"variation1h":-55.1}}"#);
        assert_eq!(change, Some(PriceChange { m5: -42.5, h1: -55.1 }));
    }

    #[test]
    fn test_missing_variation() {
        assert_eq!(parse(r#"{"data":{"variation5m":-1.0}}"#), None);
        assert_eq!(parse(r#"{"data":null}"#), None);
        assert_eq!(parse(r#"{}"#), None);
    }

    #[tokio::test]
    async fn test_missing_key_not_configured() {
        let source = DexToolsSource::new(Client::new(), "");
        let err = source.price_change("So1").await.unwrap_err();
        assert!(matches!(err, FeedError::NotConfigured(_)));
    }
}
