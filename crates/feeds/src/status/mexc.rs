//! MEXC capital config (signed).

use super::{contract_matches, ApiCredentials, StatusProvider};
use crate::error::FeedError;
use crate::http;
use async_trait::async_trait;
use dumper_core::{DepositStatus, Venue};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerTime {
    server_time: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MexcCoin {
    coin: String,
    #[serde(default)]
    network_list: Vec<MexcNetwork>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MexcNetwork {
    #[serde(default)]
    contract: Option<String>,
    #[serde(default)]
    deposit_enable: bool,
    #[serde(default)]
    min_confirm: Option<u32>,
    #[serde(default)]
    net_work: Option<String>,
}

fn find_deposit(coins: Vec<MexcCoin>, contract: &str) -> Option<DepositStatus> {
    coins.into_iter().find_map(|coin| {
        let network = coin
            .network_list
            .into_iter()
            .find(|n| n.contract.as_deref().is_some_and(|c| contract_matches(c, contract)))?;
        Some(
            DepositStatus::new(network.deposit_enable, coin.coin)
                .with_confirmations(network.min_confirm)
                .with_network(network.net_work),
        )
    })
}

pub struct MexcStatus {
    client: Client,
    credentials: ApiCredentials,
}

impl MexcStatus {
    const BASE_URL: &'static str = "https://api.mexc.com";

    pub fn new(client: Client, credentials: ApiCredentials) -> Self {
        Self { client, credentials }
    }

    /// Requests are stamped with server time to avoid recvWindow rejections.
    async fn server_time(&self) -> Result<u64, FeedError> {
        let url = format!("{}/api/v3/time", Self::BASE_URL);
        let time: ServerTime = http::get_json(&self.client, &url, &[]).await?;
        Ok(time.server_time)
    }
}

#[async_trait]
impl StatusProvider for MexcStatus {
    fn venue(&self) -> Venue {
        Venue::Mexc
    }

    async fn check_deposit(&self, contract: &str) -> Result<Option<DepositStatus>, FeedError> {
        if !self.credentials.is_configured() {
            return Err(FeedError::NotConfigured("MEXC_API_KEY / MEXC_SECRET_KEY"));
        }

        let timestamp = self.server_time().await?;
        let query = format!("recvWindow=5000&timestamp={}", timestamp);
        let signature = http::sign_hmac_sha256(&query, &self.credentials.secret_key)?;
        let url = format!(
            "{}/api/v3/capital/config/getall?{}&signature={}",
            Self::BASE_URL,
            query,
            signature
        );

        let coins: Vec<MexcCoin> = http::get_json(
            &self.client,
            &url,
            &[("X-MEXC-APIKEY", &self.credentials.api_key)],
        )
        .await?;
        Ok(find_deposit(coins, contract))
    }
}
