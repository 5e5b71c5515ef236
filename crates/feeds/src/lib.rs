//! Upstream data for the dump screener.
//!
//! ## Architecture
//!
//! - `source` - DexScreener pair snapshots (`MarketDataSource`)
//! - `status/` - per-venue deposit status (`StatusProvider`)
//! - `orderbook` - REST depth per venue (`OrderBookProvider`)
//! - `registry` - venue → order book provider lookup
//! - `confirm` - DexTools price change for Solana confirmation
//! - `listing` - CoinGecko market listings

pub mod confirm;
pub mod error;
pub mod http;
pub mod listing;
pub mod orderbook;
pub mod registry;
pub mod source;
pub mod status;
pub mod universe;

pub use confirm::*;
pub use error::*;
pub use listing::*;
pub use orderbook::*;
pub use registry::*;
pub use source::*;
pub use status::{
    default_providers, load_gate_contracts, ApiCredentials, StatusProvider, StatusSettings,
};
pub use universe::*;
