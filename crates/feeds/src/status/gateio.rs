//! Gate.io currency chains.
//!
//! Gate.io has no public contract search, so the ticker comes from a local
//! `contract / ticker` mapping file.

use super::{contract_matches, StatusProvider};
use crate::error::FeedError;
use crate::http;
use async_trait::async_trait;
use dumper_core::{DepositStatus, Venue};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Parse `contract / ticker` lines. Malformed lines are skipped.
pub fn parse_gate_contracts(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter_map(|line| {
            let (contract, ticker) = line.trim().split_once(" / ")?;
            let (contract, ticker) = (contract.trim(), ticker.trim());
            if contract.is_empty() || ticker.is_empty() {
                return None;
            }
            Some((contract.to_lowercase(), ticker.to_string()))
        })
        .collect()
}

/// Load the contract mapping file.
pub fn load_gate_contracts(path: impl AsRef<Path>) -> Result<HashMap<String, String>, FeedError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| FeedError::Config(format!("{}: {}", path.display(), e)))?;
    Ok(parse_gate_contracts(&content))
}

#[derive(Debug, Deserialize)]
struct GateChain {
    #[serde(default)]
    contract_address: Option<String>,
    /// 0 means deposits are open
    #[serde(default)]
    is_deposit_disabled: serde_json::Value,
    #[serde(default)]
    chain: Option<String>,
}

fn find_deposit(chains: Vec<GateChain>, ticker: &str, contract: &str) -> Option<DepositStatus> {
    let chain = chains.into_iter().find(|c| {
        c.contract_address
            .as_deref()
            .is_some_and(|ca| contract_matches(ca, contract))
    })?;
    let disabled = http::value_as_bool(&chain.is_deposit_disabled).unwrap_or(true);
    Some(DepositStatus::new(!disabled, ticker).with_network(chain.chain))
}

pub struct GateIoStatus {
    client: Client,
    contracts: HashMap<String, String>,
}

impl GateIoStatus {
    const BASE_URL: &'static str = "https://api.gateio.ws/api/v4";

    pub fn new(client: Client, contracts: HashMap<String, String>) -> Self {
        Self { client, contracts }
    }

    pub fn ticker_for(&self, contract: &str) -> Option<&str> {
        self.contracts
            .get(&contract.trim().to_lowercase())
            .map(String::as_str)
    }
}

#[async_trait]
impl StatusProvider for GateIoStatus {
    fn venue(&self) -> Venue {
        Venue::GateIo
    }

    async fn check_deposit(&self, contract: &str) -> Result<Option<DepositStatus>, FeedError> {
        let Some(ticker) = self.ticker_for(contract) else {
            return Ok(None);
        };

        let url = format!("{}/wallet/currency_chains?currency={}", Self::BASE_URL, ticker);
        let chains: Vec<GateChain> =
            http::get_json(&self.client, &url, &[("Accept", "application/json")]).await?;
        Ok(find_deposit(chains, ticker, contract))
    }
}
