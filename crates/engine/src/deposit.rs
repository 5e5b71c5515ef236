//! Concurrent deposit status fan-out across venues.

use dumper_core::{DepositAggregateResult, DepositStatus, Venue};
use dumper_feeds::StatusProvider;
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default bound on a single provider call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(15);

pub struct DepositAggregator {
    providers: Vec<Arc<dyn StatusProvider>>,
    timeout: Duration,
}

impl DepositAggregator {
    pub fn new(providers: Vec<Arc<dyn StatusProvider>>, timeout: Duration) -> Self {
        Self { providers, timeout }
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Query every provider concurrently and keep whatever answered.
    ///
    /// Never fails: errors, timeouts, panics and misses are logged and omitted.
    pub async fn aggregate(&self, contract: &str) -> DepositAggregateResult {
        let handles: Vec<_> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let contract = contract.to_string();
                let timeout = self.timeout;
                let venue = provider.venue();
                let handle = tokio::spawn(async move {
                    tokio::time::timeout(timeout, provider.check_deposit(&contract)).await
                });
                (venue, handle)
            })
            .collect();

        let (venues, handles): (Vec<Venue>, Vec<_>) = handles.into_iter().unzip();
        let results = join_all(handles).await;

        let mut entries: Vec<(Venue, DepositStatus)> = Vec::with_capacity(results.len());
        for (venue, joined) in venues.into_iter().zip(results) {
            match joined {
                Ok(Ok(Ok(Some(status)))) => entries.push((venue, status)),
                Ok(Ok(Ok(None))) => debug!(venue = %venue, contract, "Contract not listed"),
                Ok(Ok(Err(e))) => warn!(venue = %venue, contract, error = %e, "Deposit check failed"),
                Ok(Err(_)) => warn!(
                    venue = %venue,
                    contract,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Deposit check timed out"
                ),
                Err(e) => warn!(venue = %venue, contract, error = %e, "Deposit check task failed"),
            }
        }

        let result = DepositAggregateResult::from_entries(entries);
        debug!(
            contract,
            venues = result.len(),
            enabled = result.enabled().len(),
            "Deposit aggregation done"
        );
        result
    }
}
