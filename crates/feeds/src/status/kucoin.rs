//! KuCoin currency list with per-chain contract addresses.

use super::{contract_matches, StatusProvider};
use crate::error::FeedError;
use crate::http;
use async_trait::async_trait;
use dumper_core::{DepositStatus, Venue};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CurrenciesResponse {
    #[serde(default)]
    data: Option<Vec<KuCoinCurrency>>,
}

#[derive(Debug, Deserialize)]
struct KuCoinCurrency {
    currency: String,
    #[serde(default)]
    chains: Option<Vec<KuCoinChain>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KuCoinChain {
    #[serde(default)]
    contract_address: Option<String>,
    #[serde(default)]
    is_deposit_enabled: bool,
    #[serde(default)]
    confirms: Option<u32>,
    #[serde(default)]
    chain_id: Option<String>,
}

fn find_deposit(resp: CurrenciesResponse, contract: &str) -> Result<Option<DepositStatus>, FeedError> {
    let currencies = resp
        .data
        .ok_or_else(|| FeedError::Api("KuCoin response without data".to_string()))?;

    for currency in currencies {
        for chain in currency.chains.unwrap_or_default() {
            let matched = chain
                .contract_address
                .as_deref()
                .is_some_and(|ca| contract_matches(ca, contract));
            if matched {
                return Ok(Some(
                    DepositStatus::new(chain.is_deposit_enabled, currency.currency)
                        .with_confirmations(chain.confirms)
                        .with_network(chain.chain_id),
                ));
            }
        }
    }
    Ok(None)
}

pub struct KuCoinStatus {
    client: Client,
}

impl KuCoinStatus {
    const URL: &'static str = "https://api.kucoin.com/api/v3/currencies";

    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusProvider for KuCoinStatus {
    fn venue(&self) -> Venue {
        Venue::KuCoin
    }

    async fn check_deposit(&self, contract: &str) -> Result<Option<DepositStatus>, FeedError> {
        let resp: CurrenciesResponse = http::get_json(&self.client, Self::URL, &[]).await?;
        find_deposit(resp, contract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_deposit() {
        let resp: CurrenciesResponse = serde_json::from_str(
            r#"{"code":"200000","data":[
                {"currency":"BTC","chains":[{"chainId":"btc","contractAddress":"","isDepositEnabled":true,"confirms":2}]},
                {"currency":"NOCHAINS","chains":null},
                {"currency":"PEPE","chains":[{"chainId":"eth","contractAddress":"0xABC","isDepositEnabled":false,"confirms":64}]}
            ]}"#,
        )
        .unwrap();

        let status = find_deposit(resp, "0xabc").unwrap().unwrap();
        assert_eq!(status.coin, "PEPE");
        assert!(!status.enabled);
        assert_eq!(status.confirmations, Some(64));
        assert_eq!(status.network.as_deref(), Some("eth"));
    }

    #[test]
    fn test_no_match() {
        let resp: CurrenciesResponse = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert_eq!(find_deposit(resp, "0xabc").unwrap(), None);
    }

    #[test]
    fn test_missing_data() {
        let resp: CurrenciesResponse = serde_json::from_str(r#"{"code":"400100"}"#).unwrap();
        assert!(find_deposit(resp, "0xabc").is_err());
    }
}
