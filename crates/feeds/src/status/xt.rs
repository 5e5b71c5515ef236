//! XT.COM supported currencies.

use super::{contract_matches, StatusProvider};
use crate::error::FeedError;
use crate::http;
use async_trait::async_trait;
use dumper_core::{DepositStatus, Venue};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CurrencyResponse {
    rc: i64,
    #[serde(default)]
    mc: Option<String>,
    #[serde(default)]
    result: Vec<XtCurrency>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct XtCurrency {
    currency: String,
    #[serde(default)]
    support_chains: Vec<XtChain>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct XtChain {
    #[serde(default)]
    chain: Option<String>,
    #[serde(default)]
    contract: Option<String>,
    #[serde(default)]
    deposit_enabled: bool,
}

fn find_deposit(resp: CurrencyResponse, contract: &str) -> Result<Option<DepositStatus>, FeedError> {
    if resp.rc != 0 {
        return Err(FeedError::Api(format!(
            "XT rc {}: {}",
            resp.rc,
            resp.mc.unwrap_or_default()
        )));
    }

    Ok(resp.result.into_iter().find_map(|currency| {
        let chain = currency
            .support_chains
            .into_iter()
            .find(|c| c.contract.as_deref().is_some_and(|ca| contract_matches(ca, contract)))?;
        Some(DepositStatus::new(chain.deposit_enabled, currency.currency).with_network(chain.chain))
    }))
}

pub struct XtStatus {
    client: Client,
}

impl XtStatus {
    const URL: &'static str = "https://sapi.xt.com/v4/public/wallet/support/currency";

    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusProvider for XtStatus {
    fn venue(&self) -> Venue {
        Venue::Xt
    }

    async fn check_deposit(&self, contract: &str) -> Result<Option<DepositStatus>, FeedError> {
        let resp: CurrencyResponse = http::get_json(&self.client, Self::URL, &[]).await?;
        find_deposit(resp, contract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_deposit() {
        let resp: CurrencyResponse = serde_json::from_str(
            r#"{"rc":0,"mc":"SUCCESS","result":[
                {"currency":"pepe","supportChains":[
                    {"chain":"Ethereum","depositEnabled":true,"withdrawEnabled":true,"contract":"0xPEPE"}
                ]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            find_deposit(resp, "0xpepe").unwrap(),
            Some(DepositStatus::new(true, "pepe").with_network(Some("Ethereum".to_string())))
        );
    }

    #[test]
    fn test_rc_error() {
        let resp: CurrencyResponse = serde_json::from_str(r#"{"rc":1,"mc":"FAIL"}"#).unwrap();
        assert!(find_deposit(resp, "0x").is_err());
    }
}
