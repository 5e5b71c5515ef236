//! Centralized market listings of a token.

use serde::{Deserialize, Serialize};

/// One market where the token trades, with its last USD price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketListing {
    pub market: String,
    pub last_usd: f64,
    pub trade_url: Option<String>,
}

impl MarketListing {
    /// Spread of the listing's last price over the DEX price, in percent.
    pub fn spread_pct(&self, dex_price: f64) -> f64 {
        if self.last_usd == 0.0 {
            return 0.0;
        }
        (self.last_usd - dex_price) / self.last_usd * 100.0
    }
}
