//! Secondary confirmation for strict (Solana) candidates.

use dumper_core::TokenPairSnapshot;
use dumper_feeds::PriceChangeSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmConfig {
    /// Maximum relative difference between primary and secondary changes.
    pub tolerance: f64,
    /// Pause after each secondary call.
    pub pause_ms: u64,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.20,
            pause_ms: 2_000,
        }
    }
}

/// `|a - b| / max(|a|, |b|) <= tolerance`. Two zeros agree.
pub fn within_tolerance(a: f64, b: f64, tolerance: f64) -> bool {
    let scale = a.abs().max(b.abs());
    if scale == 0.0 {
        return true;
    }
    (a - b).abs() / scale <= tolerance
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Diverged,
    Unavailable,
}

pub struct StrictConfirmer {
    source: Arc<dyn PriceChangeSource>,
    config: ConfirmConfig,
}

impl StrictConfirmer {
    pub fn new(source: Arc<dyn PriceChangeSource>, config: ConfirmConfig) -> Self {
        Self { source, config }
    }

    pub async fn confirm(&self, snapshot: &TokenPairSnapshot) -> Confirmation {
        let result = self.source.price_change(&snapshot.base_address).await;
        tokio::time::sleep(Duration::from_millis(self.config.pause_ms)).await;

        let secondary = match result {
            Ok(Some(change)) => change,
            Ok(None) => {
                info!(contract = %snapshot.base_address, "No secondary price data");
                return Confirmation::Unavailable;
            }
            Err(e) => {
                warn!(contract = %snapshot.base_address, error = %e, "Secondary price source failed");
                return Confirmation::Unavailable;
            }
        };

        let (Some(m5), Some(h1)) = (snapshot.change_m5, snapshot.change_h1) else {
            return Confirmation::Unavailable;
        };

        let tolerance = self.config.tolerance;
        if within_tolerance(m5, secondary.m5, tolerance) && within_tolerance(h1, secondary.h1, tolerance) {
            Confirmation::Confirmed
        } else {
            info!(
                contract = %snapshot.base_address,
                m5,
                h1,
                secondary_m5 = secondary.m5,
                secondary_h1 = secondary.h1,
                "Price changes diverge, dropping candidate"
            );
            Confirmation::Diverged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::snapshot;
    use async_trait::async_trait;
    use dumper_feeds::{FeedError, PriceChange};

    #[test]
    fn test_within_tolerance() {
        assert!(within_tolerance(-50.0, -45.0, 0.20));
        assert!(within_tolerance(-50.0, -40.0, 0.20));
        assert!(!within_tolerance(-50.0, -39.0, 0.20));
        assert!(within_tolerance(0.0, 0.0, 0.20));
        assert!(!within_tolerance(0.0, 1.0, 0.20));
        assert!(!within_tolerance(-10.0, 10.0, 0.20));
    }

    struct FixedSource(Option<PriceChange>);

    #[async_trait]
    impl PriceChangeSource for FixedSource {
        async fn price_change(&self, _address: &str) -> Result<Option<PriceChange>, FeedError> {
            Ok(self.0)
        }
    }

    struct FailingSource;

    #[async_trait]
    impl PriceChangeSource for FailingSource {
        async fn price_change(&self, _address: &str) -> Result<Option<PriceChange>, FeedError> {
            Err(FeedError::Http { status: 429, body: String::new() })
        }
    }

    fn confirmer(source: Arc<dyn PriceChangeSource>) -> StrictConfirmer {
        StrictConfirmer::new(source, ConfirmConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed() {
        let snap = snapshot("BONK", "solana", Some(-45.0), Some(-60.0));
        let c = confirmer(Arc::new(FixedSource(Some(PriceChange { m5: -44.0, h1: -58.0 }))));
        assert_eq!(c.confirm(&snap).await, Confirmation::Confirmed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_diverged_on_one_window() {
        let snap = snapshot("BONK", "solana", Some(-45.0), Some(-60.0));
        let c = confirmer(Arc::new(FixedSource(Some(PriceChange { m5: -44.0, h1: -10.0 }))));
        assert_eq!(c.confirm(&snap).await, Confirmation::Diverged);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_or_failed_is_unavailable() {
        let snap = snapshot("BONK", "solana", Some(-45.0), Some(-60.0));
        assert_eq!(
            confirmer(Arc::new(FixedSource(None))).confirm(&snap).await,
            Confirmation::Unavailable
        );
        assert_eq!(
            confirmer(Arc::new(FailingSource)).confirm(&snap).await,
            Confirmation::Unavailable
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_after_call() {
        let snap = snapshot("BONK", "solana", Some(-45.0), Some(-60.0));
        let c = confirmer(Arc::new(FixedSource(None)));
        let start = tokio::time::Instant::now();
        c.confirm(&snap).await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
