//! Bitget public coin list.

use super::{contract_matches, StatusProvider};
use crate::error::FeedError;
use crate::http;
use async_trait::async_trait;
use dumper_core::{DepositStatus, Venue};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CoinsResponse {
    code: String,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Vec<BitgetCoin>,
}

#[derive(Debug, Deserialize)]
struct BitgetCoin {
    coin: String,
    #[serde(default)]
    chains: Vec<BitgetChain>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BitgetChain {
    #[serde(default)]
    contract_address: Option<String>,
    /// "true" / "false" as a string
    #[serde(default)]
    rechargeable: serde_json::Value,
    #[serde(default)]
    deposit_confirm: serde_json::Value,
    #[serde(default)]
    chain: Option<String>,
}

fn find_deposit(resp: CoinsResponse, contract: &str) -> Result<Option<DepositStatus>, FeedError> {
    if resp.code != "00000" {
        return Err(FeedError::Api(format!(
            "Bitget code {}: {}",
            resp.code,
            resp.msg.unwrap_or_default()
        )));
    }

    Ok(resp.data.into_iter().find_map(|coin| {
        let chain = coin.chains.into_iter().find(|c| {
            c.contract_address
                .as_deref()
                .is_some_and(|ca| contract_matches(ca, contract))
        })?;
        let enabled = http::value_as_bool(&chain.rechargeable).unwrap_or(false);
        Some(
            DepositStatus::new(enabled, coin.coin)
                .with_confirmations(http::value_as_u32(&chain.deposit_confirm))
                .with_network(chain.chain),
        )
    }))
}

pub struct BitgetStatus {
    client: Client,
}

impl BitgetStatus {
    const URL: &'static str = "https://api.bitget.com/api/v2/spot/public/coins";

    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusProvider for BitgetStatus {
    fn venue(&self) -> Venue {
        Venue::Bitget
    }

    async fn check_deposit(&self, contract: &str) -> Result<Option<DepositStatus>, FeedError> {
        let resp: CoinsResponse = http::get_json(&self.client, Self::URL, &[]).await?;
        find_deposit(resp, contract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_deposit() {
        let resp: CoinsResponse = serde_json::from_str(
            r#"{"code":"00000","msg":"success","data":[
                {"coinId":"1","coin":"PEPE","chains":[
                    {"chain":"ERC20","contractAddress":"0xPEPE","rechargeable":"true","depositConfirm":"12"}
                ]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            find_deposit(resp, "0xpepe").unwrap(),
            Some(
                DepositStatus::new(true, "PEPE")
                    .with_confirmations(Some(12))
                    .with_network(Some("ERC20".to_string()))
            )
        );
    }

    #[test]
    fn test_disabled_deposit() {
        let resp: CoinsResponse = serde_json::from_str(
            r#"{"code":"00000","data":[{"coin":"X","chains":[{"chain":"BEP20","contractAddress":"0xX","rechargeable":"false"}]}]}"#,
        )
        .unwrap();
        let status = find_deposit(resp, "0xx").unwrap().unwrap();
        assert!(!status.enabled);
        assert_eq!(status.confirmations, None);
    }

    #[test]
    fn test_api_error() {
        let resp: CoinsResponse =
            serde_json::from_str(r#"{"code":"40001","msg":"bad","data":[]}"#).unwrap();
        assert!(matches!(find_deposit(resp, "0x"), Err(FeedError::Api(_))));
    }
}
