//! Blockchain identifiers as reported by the market-data screener.

use serde::{Deserialize, Serialize};

/// Blockchain network identifier.
/// Uses u8 representation for compact serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Chain {
    // EVM chains (1-29)
    Ethereum = 1,
    Bsc = 2,
    Polygon = 3,
    Arbitrum = 4,
    Optimism = 5,
    Avalanche = 6,
    Fantom = 7,
    Base = 8,
    ZkSync = 9,
    Linea = 10,
    Blast = 11,
    Mantle = 12,
    Mode = 13,
    Scroll = 14,
    Core = 15,

    // Non-EVM chains (30+)
    Solana = 30,
    Aptos = 31,
    Ton = 32,
}

impl Chain {
    /// Parse the screener's chain id (e.g. "ethereum", "bsc", "solana").
    pub fn from_screener_id(id: &str) -> Option<Self> {
        match id {
            "ethereum" => Some(Chain::Ethereum),
            "bsc" => Some(Chain::Bsc),
            "polygon" => Some(Chain::Polygon),
            "arbitrum" => Some(Chain::Arbitrum),
            "optimism" => Some(Chain::Optimism),
            "avalanche" => Some(Chain::Avalanche),
            "fantom" => Some(Chain::Fantom),
            "base" => Some(Chain::Base),
            "zksync" => Some(Chain::ZkSync),
            "linea" => Some(Chain::Linea),
            "blast" => Some(Chain::Blast),
            "mantle" => Some(Chain::Mantle),
            "mode" => Some(Chain::Mode),
            "scroll" => Some(Chain::Scroll),
            "core" => Some(Chain::Core),
            "solana" => Some(Chain::Solana),
            "aptos" => Some(Chain::Aptos),
            "ton" => Some(Chain::Ton),
            _ => None,
        }
    }

    /// Get u8 ID of this chain.
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn is_solana(self) -> bool {
        matches!(self, Chain::Solana)
    }

    /// The screener's own id for this chain.
    pub fn screener_id(self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Bsc => "bsc",
            Chain::Polygon => "polygon",
            Chain::Arbitrum => "arbitrum",
            Chain::Optimism => "optimism",
            Chain::Avalanche => "avalanche",
            Chain::Fantom => "fantom",
            Chain::Base => "base",
            Chain::ZkSync => "zksync",
            Chain::Linea => "linea",
            Chain::Blast => "blast",
            Chain::Mantle => "mantle",
            Chain::Mode => "mode",
            Chain::Scroll => "scroll",
            Chain::Core => "core",
            Chain::Solana => "solana",
            Chain::Aptos => "aptos",
            Chain::Ton => "ton",
        }
    }

    /// Chain segment used by DexTools and DefiLlama URLs.
    pub fn explorer_key(self) -> Option<&'static str> {
        match self {
            Chain::Ethereum => Some("ether"),
            Chain::Bsc => Some("bnb"),
            Chain::Polygon => Some("polygon"),
            Chain::Arbitrum => Some("arbitrum"),
            Chain::Optimism => Some("optimism"),
            Chain::Avalanche => Some("avalanche"),
            Chain::Fantom => Some("fantom"),
            Chain::Base => Some("base"),
            Chain::ZkSync => Some("zksync"),
            Chain::Linea => Some("linea"),
            Chain::Blast => Some("blast"),
            Chain::Mantle => Some("mantle"),
            Chain::Mode => Some("mode"),
            Chain::Scroll => Some("scroll"),
            Chain::Core => Some("coredao"),
            Chain::Solana => Some("solana"),
            Chain::Aptos => Some("aptos"),
            Chain::Ton => None,
        }
    }

    /// Numeric chain id used by the 1inch swap UI (EVM only).
    pub fn oneinch_id(self) -> Option<&'static str> {
        match self {
            Chain::Ethereum => Some("1"),
            Chain::Bsc => Some("56"),
            Chain::Fantom => Some("250"),
            Chain::Polygon => Some("137"),
            Chain::Arbitrum => Some("42161"),
            Chain::Optimism => Some("10"),
            Chain::Avalanche => Some("43114"),
            Chain::ZkSync => Some("324"),
            Chain::Base => Some("8453"),
            _ => None,
        }
    }

    /// Asset platform id on CoinGecko.
    pub fn coingecko_platform(self) -> Option<&'static str> {
        match self {
            Chain::Ethereum => Some("ethereum"),
            Chain::Bsc => Some("binance-smart-chain"),
            Chain::Polygon => Some("polygon-pos"),
            Chain::Arbitrum => Some("arbitrum-one"),
            Chain::Optimism => Some("optimistic-ethereum"),
            Chain::Avalanche => Some("avalanche"),
            Chain::Fantom => Some("fantom"),
            Chain::Base => Some("base"),
            Chain::ZkSync => Some("zksync"),
            Chain::Linea => Some("linea"),
            Chain::Blast => Some("blast"),
            Chain::Mantle => Some("mantle"),
            Chain::Mode => Some("mode"),
            Chain::Scroll => Some("scroll"),
            Chain::Core => Some("core"),
            Chain::Solana => Some("solana"),
            Chain::Aptos => Some("aptos"),
            Chain::Ton => Some("the-open-network"),
        }
    }
}
