//! REST order book fetchers for the top of the bid side.
//!
//! Every venue exposes a public depth endpoint. They differ only in URL,
//! symbol format and where the bid array sits in the response, so a
//! single provider is parameterized per venue.

use crate::error::FeedError;
use crate::http;
use async_trait::async_trait;
use dumper_core::{OrderBookLevel, Venue, MAX_LEVELS};
use reqwest::Client;
use tracing::debug;

#[async_trait]
pub trait OrderBookProvider: Send + Sync {
    fn venue(&self) -> Venue;

    /// Up to [`MAX_LEVELS`] best bids for a `BASE/QUOTE` symbol, best first.
    async fn top_bids(&self, symbol: &str) -> Result<Vec<OrderBookLevel>, FeedError>;
}

/// Depth endpoint for a venue market symbol.
pub fn depth_url(venue: Venue, market: &str) -> String {
    match venue {
        Venue::Htx => format!(
            "https://api.huobi.pro/market/depth?symbol={}&type=step0",
            market
        ),
        Venue::KuCoin => format!(
            "https://api.kucoin.com/api/v1/market/orderbook/level2_20?symbol={}",
            market
        ),
        Venue::Mexc => format!("https://api.mexc.com/api/v3/depth?symbol={}&limit=5", market),
        Venue::Bitget => format!(
            "https://api.bitget.com/api/v2/spot/market/orderbook?symbol={}&type=step0&limit=5",
            market
        ),
        Venue::BingX => format!(
            "https://open-api.bingx.com/openApi/spot/v1/market/depth?symbol={}&limit=5",
            market
        ),
        Venue::GateIo => format!(
            "https://api.gateio.ws/api/v4/spot/order_book?currency_pair={}&limit=5",
            market
        ),
        Venue::CoinEx => format!(
            "https://api.coinex.com/v2/spot/depth?market={}&limit=5&interval=0",
            market
        ),
        Venue::BitMart => format!(
            "https://api-cloud.bitmart.com/spot/quotation/v3/books?symbol={}&limit=5",
            market
        ),
        Venue::Xt => format!("https://sapi.xt.com/v4/public/depth?symbol={}&limit=5", market),
    }
}

/// JSON pointer to the bid array in a venue depth response.
pub fn bids_pointer(venue: Venue) -> &'static str {
    match venue {
        Venue::Htx => "/tick/bids",
        Venue::KuCoin | Venue::Bitget | Venue::BingX | Venue::BitMart => "/data/bids",
        Venue::Mexc | Venue::GateIo => "/bids",
        Venue::CoinEx => "/data/depth/bids",
        Venue::Xt => "/result/bids",
    }
}

/// Parse `[[price, size], ...]`, numbers as strings or JSON numbers.
///
/// Invalid levels are kept as-is; the caller decides what to discard.
pub fn parse_bids(body: &serde_json::Value, pointer: &str) -> Result<Vec<OrderBookLevel>, FeedError> {
    let bids = body
        .pointer(pointer)
        .and_then(|v| v.as_array())
        .ok_or_else(|| FeedError::Parse(format!("missing bid array at {}", pointer)))?;

    Ok(bids
        .iter()
        .take(MAX_LEVELS)
        .filter_map(|level| {
            let level = level.as_array()?;
            let price = http::value_as_f64(level.first()?)?;
            let size = http::value_as_f64(level.get(1)?)?;
            Some(OrderBookLevel::new(price, size))
        })
        .collect())
}

/// Public REST depth provider for one venue.
pub struct RestDepthProvider {
    venue: Venue,
    client: Client,
}

impl RestDepthProvider {
    pub fn new(venue: Venue, client: Client) -> Self {
        Self { venue, client }
    }
}

#[async_trait]
impl OrderBookProvider for RestDepthProvider {
    fn venue(&self) -> Venue {
        self.venue
    }

    async fn top_bids(&self, symbol: &str) -> Result<Vec<OrderBookLevel>, FeedError> {
        let (base, quote) = dumper_core::split_symbol(symbol)
            .ok_or_else(|| FeedError::Parse(format!("invalid symbol {}", symbol)))?;
        let market = self.venue.market_symbol(base, quote);
        let url = depth_url(self.venue, &market);

        let body: serde_json::Value = http::get_json(&self.client, &url, &[]).await?;
        let bids = parse_bids(&body, bids_pointer(self.venue))?;
        debug!(venue = %self.venue, market = %market, levels = bids.len(), "Fetched bids");
        Ok(bids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_string_levels() {
        let body = json!({"code": "00000", "data": {"bids": [["1.5", "10"], ["1.4", "20"], ["1.3", "30"], ["1.2", "40"]]}});
        let bids = parse_bids(&body, bids_pointer(Venue::Bitget)).unwrap();
        assert_eq!(
            bids,
            vec![
                OrderBookLevel::new(1.5, 10.0),
                OrderBookLevel::new(1.4, 20.0),
                OrderBookLevel::new(1.3, 30.0),
            ]
        );
    }

    #[test]
    fn test_parse_numeric_levels() {
        let body = json!({"ch": "market.pepeusdt.depth.step0", "tick": {"bids": [[0.5, 100.0], [0.0, 5.0]]}});
        let bids = parse_bids(&body, bids_pointer(Venue::Htx)).unwrap();
        assert_eq!(
            bids,
            vec![OrderBookLevel::new(0.5, 100.0), OrderBookLevel::new(0.0, 5.0)]
        );
    }

    #[test]
    fn test_missing_bids() {
        let body = json!({"code": 0, "data": {}});
        assert!(parse_bids(&body, bids_pointer(Venue::CoinEx)).is_err());
    }

    #[test]
    fn test_depth_url_uses_venue_symbol() {
        let market = Venue::GateIo.market_symbol("PEPE", "USDT");
        assert_eq!(
            depth_url(Venue::GateIo, &market),
            "https://api.gateio.ws/api/v4/spot/order_book?currency_pair=PEPE_USDT&limit=5"
        );
    }

    #[tokio::test]
    async fn test_invalid_symbol() {
        let provider = RestDepthProvider::new(Venue::Mexc, Client::new());
        assert!(matches!(
            provider.top_bids("PEPEUSDT").await,
            Err(FeedError::Parse(_))
        ));
    }
}
