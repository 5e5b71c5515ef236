//! Token pair snapshots produced by the market-data source.

use crate::chain::Chain;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Optional project links attached to a pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectLinks {
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
}

/// Point-in-time market data for a single on-chain trading pair.
///
/// Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPairSnapshot {
    pub base_symbol: CompactString,
    pub quote_symbol: CompactString,
    /// Contract address of the base token.
    pub base_address: String,
    pub pair_address: String,
    /// Screener chain id, e.g. "ethereum" or "solana".
    pub chain_id: String,
    /// DEX identifier, e.g. "uniswap" or "raydium".
    pub dex_id: String,
    pub price_usd: f64,
    /// Total pool liquidity in USD.
    pub liquidity_usd: f64,
    /// Pool liquidity denominated in the base token.
    pub liquidity_base: f64,
    /// 5-minute price change in percent.
    pub change_m5: Option<f64>,
    /// 1-hour price change in percent.
    pub change_h1: Option<f64>,
    pub url: String,
    pub links: ProjectLinks,
}

impl TokenPairSnapshot {
    /// Parsed chain, `None` if the screener reports a chain we do not know.
    pub fn chain(&self) -> Option<Chain> {
        Chain::from_screener_id(&self.chain_id)
    }

    #[inline]
    pub fn is_solana(&self) -> bool {
        self.chain_id == "solana"
    }

    pub fn seen_key(&self) -> SeenKey {
        SeenKey {
            base: self.base_symbol.clone(),
            quote: self.quote_symbol.clone(),
        }
    }

    /// `BASE/QUOTE` label.
    pub fn pair_label(&self) -> String {
        format!("{}/{}", self.base_symbol, self.quote_symbol)
    }

    /// Quote side of the pool in USD: `total - base * price`.
    #[inline]
    pub fn native_liquidity_usd(&self) -> f64 {
        self.liquidity_usd - self.liquidity_base * self.price_usd
    }

    /// Base token side of the pool in USD.
    #[inline]
    pub fn token_liquidity_usd(&self) -> f64 {
        self.liquidity_usd - self.native_liquidity_usd()
    }
}

/// Deduplication key: one alert per symbol pair per cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeenKey {
    pub base: CompactString,
    pub quote: CompactString,
}
