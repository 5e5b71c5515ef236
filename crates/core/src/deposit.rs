//! Deposit status as reported by centralized venues.

use crate::venue::Venue;
use serde::{Deserialize, Serialize};

/// Deposit status of one contract on one venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositStatus {
    pub enabled: bool,
    /// Venue-local coin ticker.
    pub coin: String,
    pub confirmations: Option<u32>,
    pub network: Option<String>,
}

impl DepositStatus {
    pub fn new(enabled: bool, coin: impl Into<String>) -> Self {
        Self {
            enabled,
            coin: coin.into(),
            confirmations: None,
            network: None,
        }
    }

    pub fn with_confirmations(mut self, confirmations: Option<u32>) -> Self {
        self.confirmations = confirmations;
        self
    }

    pub fn with_network(mut self, network: Option<String>) -> Self {
        self.network = network.filter(|n| !n.is_empty());
        self
    }
}

/// Deposit statuses collected across venues.
///
/// Entries are always in canonical venue order. Venues that failed or do
/// not list the contract are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepositAggregateResult {
    entries: Vec<(Venue, DepositStatus)>,
}

impl DepositAggregateResult {
    pub fn from_entries(mut entries: Vec<(Venue, DepositStatus)>) -> Self {
        entries.sort_by_key(|(venue, _)| *venue);
        entries.dedup_by_key(|(venue, _)| *venue);
        Self { entries }
    }

    pub fn entries(&self) -> &[(Venue, DepositStatus)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `(venue, ticker)` for every venue with deposits open.
    pub fn enabled(&self) -> Vec<(Venue, String)> {
        self.entries
            .iter()
            .filter(|(_, status)| status.enabled)
            .map(|(venue, status)| (*venue, status.coin.clone()))
            .collect()
    }

    pub fn get(&self, venue: Venue) -> Option<&DepositStatus> {
        self.entries
            .iter()
            .find(|(v, _)| *v == venue)
            .map(|(_, status)| status)
    }
}
