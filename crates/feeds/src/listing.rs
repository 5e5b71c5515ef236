//! Centralized market listings from CoinGecko.

use crate::error::FeedError;
use crate::http;
use async_trait::async_trait;
use dumper_core::{Chain, MarketListing};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Maximum listing rows attached to an alert.
pub const MAX_LISTINGS: usize = 10;

/// Markets worth showing next to an alert.
pub const ALLOWED_MARKETS: &[&str] = &[
    "Binance",
    "Bybit",
    "OKX",
    "Bitget",
    "Gate.io",
    "Coinbase Pro",
    "Upbit",
    "HTX",
    "DigiFinex",
    "BitMart",
    "Kraken",
    "KuCoin",
    "Bithumb",
    "ProBit",
    "Bitfinex",
    "BitMEX",
    "Bitrue",
    "AscendEX (BitMax)",
    "MEXC",
    "BingX",
    "XT.COM",
    "CoinEx",
    "LBank",
    "Poloniex",
];

#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn listings(&self, chain: Chain, address: &str) -> Result<Vec<MarketListing>, FeedError>;
}

#[derive(Debug, Deserialize)]
struct CoinResponse {
    #[serde(default)]
    tickers: Vec<CoinTicker>,
}

#[derive(Debug, Deserialize)]
struct CoinTicker {
    #[serde(default)]
    market: Option<CoinMarket>,
    #[serde(default)]
    converted_last: Option<ConvertedLast>,
    #[serde(default)]
    trade_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoinMarket {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ConvertedLast {
    #[serde(default)]
    usd: Option<f64>,
}

fn select_listings(resp: CoinResponse) -> Vec<MarketListing> {
    resp.tickers
        .into_iter()
        .filter_map(|t| {
            let market = t.market?.name;
            let last_usd = t.converted_last?.usd?;
            if !ALLOWED_MARKETS.contains(&market.as_str()) {
                return None;
            }
            Some(MarketListing {
                market,
                last_usd,
                trade_url: t.trade_url,
            })
        })
        .take(MAX_LISTINGS)
        .collect()
}

pub struct CoinGeckoListings {
    client: Client,
}

impl CoinGeckoListings {
    const BASE_URL: &'static str = "https://api.coingecko.com/api/v3/coins";

    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListingSource for CoinGeckoListings {
    async fn listings(&self, chain: Chain, address: &str) -> Result<Vec<MarketListing>, FeedError> {
        let Some(platform) = chain.coingecko_platform() else {
            return Ok(Vec::new());
        };

        let url = format!("{}/{}/contract/{}", Self::BASE_URL, platform, address);
        let resp: CoinResponse = http::get_json(&self.client, &url, &[]).await?;
        let listings = select_listings(resp);
        debug!(address, count = listings.len(), "CoinGecko listings");
        Ok(listings)
    }
}
