//! Per-venue deposit status providers.
//!
//! Each provider answers one question: does this venue list the contract,
//! and are deposits open for it.
//!
//! - Public endpoints: HTX, KuCoin, Bitget, Gate.io, CoinEx, BitMart, XT
//! - Signed endpoints: MEXC, BingX (HMAC-SHA256, hex)

mod bingx;
mod bitget;
mod bitmart;
mod coinex;
mod gateio;
mod htx;
mod kucoin;
mod mexc;
mod xt;

pub use bingx::BingXStatus;
pub use bitget::BitgetStatus;
pub use bitmart::BitMartStatus;
pub use coinex::CoinExStatus;
pub use gateio::{load_gate_contracts, GateIoStatus};
pub use htx::HtxStatus;
pub use kucoin::KuCoinStatus;
pub use mexc::MexcStatus;
pub use xt::XtStatus;

use crate::error::FeedError;
use async_trait::async_trait;
use dumper_core::{DepositStatus, Venue};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;

/// Deposit status lookup on a single venue.
#[async_trait]
pub trait StatusProvider: Send + Sync {
    fn venue(&self) -> Venue;

    /// `Ok(None)` when the venue does not list the contract.
    async fn check_deposit(&self, contract: &str) -> Result<Option<DepositStatus>, FeedError>;
}

/// API key pair for a signed venue.
#[derive(Debug, Clone, Default)]
pub struct ApiCredentials {
    pub api_key: String,
    pub secret_key: String,
}

impl ApiCredentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty()
    }
}

/// Everything needed to build the full provider set.
#[derive(Debug, Clone, Default)]
pub struct StatusSettings {
    pub mexc: ApiCredentials,
    pub bingx: ApiCredentials,
    /// Lower-cased contract address to Gate.io ticker.
    pub gate_contracts: HashMap<String, String>,
}

/// Case-insensitive contract comparison. Blank contracts never match.
#[inline]
pub(crate) fn contract_matches(candidate: &str, contract: &str) -> bool {
    let candidate = candidate.trim();
    !candidate.is_empty() && candidate.eq_ignore_ascii_case(contract.trim())
}

/// One provider per venue, in canonical priority order.
pub fn default_providers(client: &Client, settings: StatusSettings) -> Vec<Arc<dyn StatusProvider>> {
    vec![
        Arc::new(HtxStatus::new(client.clone())),
        Arc::new(KuCoinStatus::new(client.clone())),
        Arc::new(MexcStatus::new(client.clone(), settings.mexc)),
        Arc::new(BitgetStatus::new(client.clone())),
        Arc::new(BingXStatus::new(client.clone(), settings.bingx)),
        Arc::new(GateIoStatus::new(client.clone(), settings.gate_contracts)),
        Arc::new(CoinExStatus::new(client.clone())),
        Arc::new(BitMartStatus::new(client.clone())),
        Arc::new(XtStatus::new(client.clone())),
    ]
}
