//! CoinEx asset info plus deposit config.

use super::{contract_matches, StatusProvider};
use crate::error::FeedError;
use crate::http;
use async_trait::async_trait;
use dumper_core::{DepositStatus, Venue};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<T, FeedError> {
        match (self.code, self.data) {
            (0, Some(data)) => Ok(data),
            (code, _) => Err(FeedError::Api(format!(
                "CoinEx code {}: {}",
                code,
                self.message.unwrap_or_default()
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AssetInfo {
    short_name: String,
    #[serde(default)]
    chain_info: Vec<ChainIdentity>,
}

#[derive(Debug, Deserialize)]
struct ChainIdentity {
    #[serde(default)]
    identity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DepositConfig {
    #[serde(default)]
    chains: Vec<DepositChain>,
}

#[derive(Debug, Deserialize)]
struct DepositChain {
    #[serde(default)]
    chain: Option<String>,
    #[serde(default)]
    deposit_enabled: bool,
    #[serde(default)]
    safe_confirmations: Option<u32>,
}

fn find_asset(assets: Vec<AssetInfo>, contract: &str) -> Option<String> {
    assets
        .into_iter()
        .find(|a| {
            a.chain_info.iter().any(|c| {
                c.identity
                    .as_deref()
                    .is_some_and(|id| contract_matches(id, contract))
            })
        })
        .map(|a| a.short_name)
}

/// CoinEx reports config per asset, not per contract; the first chain wins.
fn deposit_status(config: DepositConfig, coin: String) -> Option<DepositStatus> {
    let chain = config.chains.into_iter().next()?;
    Some(
        DepositStatus::new(chain.deposit_enabled, coin)
            .with_confirmations(chain.safe_confirmations)
            .with_network(chain.chain),
    )
}

pub struct CoinExStatus {
    client: Client,
}

impl CoinExStatus {
    const BASE_URL: &'static str = "https://api.coinex.com/v2/assets";

    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusProvider for CoinExStatus {
    fn venue(&self) -> Venue {
        Venue::CoinEx
    }

    async fn check_deposit(&self, contract: &str) -> Result<Option<DepositStatus>, FeedError> {
        let url = format!("{}/info", Self::BASE_URL);
        let assets: Envelope<Vec<AssetInfo>> = http::get_json(&self.client, &url, &[]).await?;
        let Some(coin) = find_asset(assets.into_data()?, contract) else {
            return Ok(None);
        };

        let url = format!("{}/deposit-withdraw-config?ccy={}", Self::BASE_URL, coin);
        let config: Envelope<DepositConfig> = http::get_json(&self.client, &url, &[]).await?;
        Ok(deposit_status(config.into_data()?, coin))
    }
}
