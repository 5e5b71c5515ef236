//! BingX wallet capital config (signed).

use super::{contract_matches, ApiCredentials, StatusProvider};
use crate::error::FeedError;
use crate::http;
use async_trait::async_trait;
use dumper_core::{DepositStatus, Venue};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ConfigResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<Vec<BingXCoin>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BingXCoin {
    coin: String,
    #[serde(default)]
    network_list: Vec<BingXNetwork>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BingXNetwork {
    #[serde(default)]
    contract_address: Option<String>,
    #[serde(default)]
    deposit_enable: bool,
    #[serde(default)]
    min_confirm: Option<u32>,
    #[serde(default)]
    network: Option<String>,
}

fn find_deposit(resp: ConfigResponse, contract: &str) -> Result<Option<DepositStatus>, FeedError> {
    let Some(coins) = resp.data else {
        return Err(FeedError::Api(format!(
            "BingX code {}: {}",
            resp.code,
            resp.msg.unwrap_or_default()
        )));
    };

    Ok(coins.into_iter().find_map(|coin| {
        let network = coin.network_list.into_iter().find(|n| {
            n.contract_address
                .as_deref()
                .is_some_and(|ca| contract_matches(ca, contract))
        })?;
        Some(
            DepositStatus::new(network.deposit_enable, coin.coin)
                .with_confirmations(network.min_confirm)
                .with_network(network.network),
        )
    }))
}

pub struct BingXStatus {
    client: Client,
    credentials: ApiCredentials,
}

impl BingXStatus {
    const BASE_URL: &'static str = "https://open-api.bingx.com";
    const PATH: &'static str = "/openApi/wallets/v1/capital/config/getall";

    pub fn new(client: Client, credentials: ApiCredentials) -> Self {
        Self { client, credentials }
    }
}

#[async_trait]
impl StatusProvider for BingXStatus {
    fn venue(&self) -> Venue {
        Venue::BingX
    }

    async fn check_deposit(&self, contract: &str) -> Result<Option<DepositStatus>, FeedError> {
        if !self.credentials.is_configured() {
            return Err(FeedError::NotConfigured("BINGX_API_KEY / BINGX_SECRET_KEY"));
        }

        let query = format!("timestamp={}", http::timestamp_ms());
        let signature = http::sign_hmac_sha256(&query, &self.credentials.secret_key)?;
        let url = format!(
            "{}{}?{}&signature={}",
            Self::BASE_URL,
            Self::PATH,
            query,
            signature
        );

        let resp: ConfigResponse = http::get_json(
            &self.client,
            &url,
            &[("X-BX-APIKEY", &self.credentials.api_key)],
        )
        .await?;
        find_deposit(resp, contract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_deposit() {
        let resp: ConfigResponse = serde_json::from_str(
            r#"{"code":0,"timestamp":1,"data":[
                {"coin":"PEPE","name":"PEPE","networkList":[
                    {"name":"PEPE","network":"ERC20","contractAddress":" 0xPePe ","depositEnable":true,"minConfirm":20}
                ]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            find_deposit(resp, "0xpepe").unwrap(),
            Some(
                DepositStatus::new(true, "PEPE")
                    .with_confirmations(Some(20))
                    .with_network(Some("ERC20".to_string()))
            )
        );
    }

    #[test]
    fn test_error_without_data() {
        let resp: ConfigResponse =
            serde_json::from_str(r#"{"code":100001,"msg":"signature verification failed"}"#)
                .unwrap();
        assert!(matches!(find_deposit(resp, "0x"), Err(FeedError::Api(_))));
    }
}
