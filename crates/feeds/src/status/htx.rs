//! HTX (Huobi) chain settings.

use super::{contract_matches, StatusProvider};
use crate::error::FeedError;
use crate::http;
use async_trait::async_trait;
use dumper_core::{DepositStatus, Venue};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ChainsResponse {
    status: String,
    #[serde(default)]
    data: Vec<HtxChain>,
}

#[derive(Debug, Deserialize)]
struct HtxChain {
    /// Contract address
    #[serde(default)]
    ca: Option<String>,
    /// Deposit enabled
    #[serde(default)]
    de: bool,
    #[serde(default)]
    currency: String,
    /// Fast confirmations
    #[serde(default)]
    fc: Option<u32>,
    /// Display name of the chain
    #[serde(default)]
    dn: Option<String>,
}

fn find_deposit(resp: ChainsResponse, contract: &str) -> Result<Option<DepositStatus>, FeedError> {
    if resp.status != "ok" {
        return Err(FeedError::Api(format!("HTX status {}", resp.status)));
    }

    Ok(resp
        .data
        .into_iter()
        .find(|c| c.ca.as_deref().is_some_and(|ca| contract_matches(ca, contract)))
        .map(|c| {
            DepositStatus::new(c.de, c.currency)
                .with_confirmations(c.fc)
                .with_network(c.dn)
        }))
}

pub struct HtxStatus {
    client: Client,
}

impl HtxStatus {
    const URL: &'static str = "https://api.huobi.pro/v1/settings/common/chains";

    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusProvider for HtxStatus {
    fn venue(&self) -> Venue {
        Venue::Htx
    }

    async fn check_deposit(&self, contract: &str) -> Result<Option<DepositStatus>, FeedError> {
        let resp: ChainsResponse = http::get_json(&self.client, Self::URL, &[]).await?;
        find_deposit(resp, contract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_deposit() {
        let resp: ChainsResponse = serde_json::from_str(
            r#"{"status":"ok","data":[
                {"chain":"btc","currency":"btc","ca":"","de":true,"fc":1,"dn":"BTC"},
                {"chain":"pepeerc20","currency":"pepe","ca":"0x6982508145454Ce325dDbE47a25d4ec3d2311933","de":true,"fc":64,"dn":"ERC20"}
            ]}"#,
        )
        .unwrap();

        let status = find_deposit(resp, "0x6982508145454ce325ddbe47a25d4ec3d2311933").unwrap();
        assert_eq!(
            status,
            Some(
                DepositStatus::new(true, "pepe")
                    .with_confirmations(Some(64))
                    .with_network(Some("ERC20".to_string()))
            )
        );
    }

    #[test]
    fn test_error_status() {
        let resp: ChainsResponse =
            serde_json::from_str(r#"{"status":"error","err-msg":"busy"}"#).unwrap();
        assert!(matches!(find_deposit(resp, "0x1"), Err(FeedError::Api(_))));
    }
}
