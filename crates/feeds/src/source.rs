//! Market-data source: batches of token addresses to pair snapshots.

use crate::error::FeedError;
use crate::http;
use async_trait::async_trait;
use compact_str::CompactString;
use dumper_core::{ProjectLinks, TokenPairSnapshot};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Fetches pair snapshots for a batch of token contract addresses.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch_batch(&self, addresses: &[String]) -> Result<Vec<TokenPairSnapshot>, FeedError>;
}

// ============================================================================
// DexScreener
// ============================================================================

#[derive(Debug, Deserialize)]
struct ScreenerResponse {
    #[serde(default)]
    pairs: Option<Vec<ScreenerPair>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScreenerPair {
    chain_id: String,
    #[serde(default)]
    dex_id: String,
    #[serde(default)]
    url: String,
    pair_address: String,
    base_token: ScreenerToken,
    quote_token: ScreenerToken,
    #[serde(default)]
    price_usd: Option<String>,
    #[serde(default)]
    liquidity: Option<ScreenerLiquidity>,
    #[serde(default)]
    price_change: Option<ScreenerPriceChange>,
    #[serde(default)]
    info: Option<ScreenerInfo>,
}

#[derive(Debug, Deserialize)]
struct ScreenerToken {
    address: String,
    symbol: String,
}

#[derive(Debug, Default, Deserialize)]
struct ScreenerLiquidity {
    #[serde(default)]
    usd: Option<f64>,
    #[serde(default)]
    base: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ScreenerPriceChange {
    #[serde(default)]
    m5: Option<f64>,
    #[serde(default)]
    h1: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ScreenerInfo {
    #[serde(default)]
    websites: Vec<ScreenerWebsite>,
    #[serde(default)]
    socials: Vec<ScreenerSocial>,
}

#[derive(Debug, Deserialize)]
struct ScreenerWebsite {
    #[serde(default)]
    label: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct ScreenerSocial {
    #[serde(rename = "type", default)]
    kind: String,
    url: String,
}

impl ScreenerInfo {
    fn links(&self) -> ProjectLinks {
        let mut links = ProjectLinks {
            website: self
                .websites
                .iter()
                .find(|w| w.label.eq_ignore_ascii_case("website"))
                .map(|w| w.url.clone()),
            ..Default::default()
        };

        for social in &self.socials {
            if social.kind.eq_ignore_ascii_case("twitter") {
                links.twitter = Some(social.url.clone());
            } else if social.kind.eq_ignore_ascii_case("telegram") {
                links.telegram = Some(social.url.clone());
            }
        }
        links
    }
}

impl From<ScreenerPair> for TokenPairSnapshot {
    fn from(pair: ScreenerPair) -> Self {
        let liquidity = pair.liquidity.unwrap_or_default();
        let change = pair.price_change.unwrap_or_default();
        let links = pair.info.map(|i| i.links()).unwrap_or_default();

        TokenPairSnapshot {
            base_symbol: CompactString::new(&pair.base_token.symbol),
            quote_symbol: CompactString::new(&pair.quote_token.symbol),
            base_address: pair.base_token.address,
            pair_address: pair.pair_address,
            chain_id: pair.chain_id,
            dex_id: pair.dex_id,
            price_usd: pair
                .price_usd
                .and_then(|p| p.parse().ok())
                .unwrap_or(0.0),
            liquidity_usd: liquidity.usd.unwrap_or(0.0),
            liquidity_base: liquidity.base.unwrap_or(0.0),
            change_m5: change.m5,
            change_h1: change.h1,
            url: pair.url,
            links,
        }
    }
}

impl ScreenerResponse {
    fn into_snapshots(self) -> Vec<TokenPairSnapshot> {
        self.pairs
            .unwrap_or_default()
            .into_iter()
            .map(TokenPairSnapshot::from)
            .collect()
    }
}

/// Decode a DexScreener `tokens` response body.
pub fn parse_screener_response(body: &[u8]) -> Result<Vec<TokenPairSnapshot>, FeedError> {
    let resp: ScreenerResponse = serde_json::from_slice(body)?;
    Ok(resp.into_snapshots())
}

/// DexScreener `latest/dex/tokens` client.
pub struct DexScreenerSource {
    client: Client,
    base_url: String,
}

impl DexScreenerSource {
    pub const BASE_URL: &'static str = "https://api.dexscreener.com/latest/dex/tokens";

    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: Self::BASE_URL.to_string(),
        }
    }

    pub fn batch_url(&self, addresses: &[String]) -> String {
        format!("{}/{}", self.base_url, addresses.join(","))
    }
}

#[async_trait]
impl MarketDataSource for DexScreenerSource {
    async fn fetch_batch(&self, addresses: &[String]) -> Result<Vec<TokenPairSnapshot>, FeedError> {
        if addresses.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.batch_url(addresses);
        let resp: ScreenerResponse = http::get_json(&self.client, &url, &[]).await?;
        let pairs = resp.into_snapshots();
        debug!(addresses = addresses.len(), pairs = pairs.len(), "DexScreener batch fetched");
        Ok(pairs)
    }
}
