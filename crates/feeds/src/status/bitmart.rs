//! BitMart currency list.

use super::{contract_matches, StatusProvider};
use crate::error::FeedError;
use crate::http;
use async_trait::async_trait;
use dumper_core::{DepositStatus, Venue};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CurrenciesResponse {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<CurrenciesData>,
}

#[derive(Debug, Deserialize)]
struct CurrenciesData {
    #[serde(default)]
    currencies: Vec<BitMartCurrency>,
}

#[derive(Debug, Deserialize)]
struct BitMartCurrency {
    currency: String,
    #[serde(default)]
    contract_address: Option<String>,
    #[serde(default)]
    deposit_enabled: bool,
    #[serde(default)]
    network: Option<String>,
}

fn find_deposit(resp: CurrenciesResponse, contract: &str) -> Result<Option<DepositStatus>, FeedError> {
    if resp.code != 1000 {
        return Err(FeedError::Api(format!(
            "BitMart code {}: {}",
            resp.code,
            resp.message.unwrap_or_default()
        )));
    }

    Ok(resp
        .data
        .map(|d| d.currencies)
        .unwrap_or_default()
        .into_iter()
        .find(|c| {
            c.contract_address
                .as_deref()
                .is_some_and(|ca| contract_matches(ca, contract))
        })
        .map(|c| DepositStatus::new(c.deposit_enabled, c.currency).with_network(c.network)))
}

pub struct BitMartStatus {
    client: Client,
}

impl BitMartStatus {
    const URL: &'static str = "https://api-cloud.bitmart.com/account/v1/currencies";

    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusProvider for BitMartStatus {
    fn venue(&self) -> Venue {
        Venue::BitMart
    }

    async fn check_deposit(&self, contract: &str) -> Result<Option<DepositStatus>, FeedError> {
        let resp: CurrenciesResponse = http::get_json(&self.client, Self::URL, &[]).await?;
        find_deposit(resp, contract)
    }
}
