//! Centralized venues that expose deposit status and order books.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Venue identifier.
///
/// Declaration order is the canonical priority order used when
/// presenting deposit results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Venue {
    Htx = 1,
    KuCoin = 2,
    Mexc = 3,
    Bitget = 4,
    BingX = 5,
    GateIo = 6,
    CoinEx = 7,
    BitMart = 8,
    Xt = 9,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown venue: {0}")]
pub struct UnknownVenue(pub String);

impl Venue {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Venue::Htx),
            2 => Some(Venue::KuCoin),
            3 => Some(Venue::Mexc),
            4 => Some(Venue::Bitget),
            5 => Some(Venue::BingX),
            6 => Some(Venue::GateIo),
            7 => Some(Venue::CoinEx),
            8 => Some(Venue::BitMart),
            9 => Some(Venue::Xt),
            _ => None,
        }
    }

    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// All venues in canonical priority order.
    pub fn all() -> &'static [Venue] {
        &[
            Venue::Htx,
            Venue::KuCoin,
            Venue::Mexc,
            Venue::Bitget,
            Venue::BingX,
            Venue::GateIo,
            Venue::CoinEx,
            Venue::BitMart,
            Venue::Xt,
        ]
    }

    /// Display name used in alert tables.
    pub fn as_str(self) -> &'static str {
        match self {
            Venue::Htx => "HTX",
            Venue::KuCoin => "KuCoin",
            Venue::Mexc => "MEXC",
            Venue::Bitget => "Bitget",
            Venue::BingX => "BingX",
            Venue::GateIo => "Gate.io",
            Venue::CoinEx => "CoinEx",
            Venue::BitMart => "BitMart",
            Venue::Xt => "XT.COM",
        }
    }

    /// Stable lowercase key used in config files.
    pub fn key(self) -> &'static str {
        match self {
            Venue::Htx => "huobi",
            Venue::KuCoin => "kucoin",
            Venue::Mexc => "mexc",
            Venue::Bitget => "bitget",
            Venue::BingX => "bingx",
            Venue::GateIo => "gateio",
            Venue::CoinEx => "coinex",
            Venue::BitMart => "bitmart",
            Venue::Xt => "xt",
        }
    }

    /// Venue-specific spot market symbol for `base/quote`.
    pub fn market_symbol(self, base: &str, quote: &str) -> String {
        match self {
            Venue::Htx => format!("{}{}", base, quote).to_lowercase(),
            Venue::Xt => format!("{}_{}", base, quote).to_lowercase(),
            Venue::KuCoin | Venue::BingX => {
                format!("{}-{}", base.to_uppercase(), quote.to_uppercase())
            }
            Venue::GateIo | Venue::BitMart => {
                format!("{}_{}", base.to_uppercase(), quote.to_uppercase())
            }
            Venue::Mexc | Venue::Bitget | Venue::CoinEx => {
                format!("{}{}", base.to_uppercase(), quote.to_uppercase())
            }
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Venue {
    type Err = UnknownVenue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "huobi" | "htx" => Ok(Venue::Htx),
            "kucoin" => Ok(Venue::KuCoin),
            "mexc" => Ok(Venue::Mexc),
            "bitget" => Ok(Venue::Bitget),
            "bingx" => Ok(Venue::BingX),
            "gateio" | "gate.io" | "gate" => Ok(Venue::GateIo),
            "coinex" => Ok(Venue::CoinEx),
            "bitmart" => Ok(Venue::BitMart),
            "xt" | "xt.com" => Ok(Venue::Xt),
            _ => Err(UnknownVenue(s.to_string())),
        }
    }
}

/// Split a `BASE/QUOTE` symbol.
pub fn split_symbol(symbol: &str) -> Option<(&str, &str)> {
    let (base, quote) = symbol.split_once('/')?;
    if base.is_empty() || quote.is_empty() {
        return None;
    }
    Some((base, quote))
}
