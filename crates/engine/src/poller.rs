//! Rate-limited batch poller over the token universe.
//!
//! Batches are fetched concurrently. Once `request_budget` fetches are in
//! flight they are drained, and the poller waits out the rest of the pacing
//! interval before starting the next window.

use async_trait::async_trait;
use dumper_core::TokenPairSnapshot;
use dumper_feeds::{FeedError, MarketDataSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Addresses per upstream request.
    pub batch_size: usize,
    /// Fetches allowed in flight before a forced drain.
    pub request_budget: usize,
    pub window_secs: u64,
    /// Sleep between full sweeps.
    pub idle_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            batch_size: 30,
            request_budget: 295,
            window_secs: 55,
            idle_secs: 65,
        }
    }
}

impl PollerConfig {
    /// `window / request_budget`.
    pub fn pacing_interval(&self) -> Duration {
        let budget = self.request_budget.max(1) as u32;
        Duration::from_secs(self.window_secs) / budget
    }

    pub fn idle(&self) -> Duration {
        Duration::from_secs(self.idle_secs)
    }
}

/// Receives every successfully fetched batch, in completion order.
#[async_trait]
pub trait BatchSink: Send + Sync {
    async fn handle_batch(&self, pairs: Vec<TokenPairSnapshot>);

    /// Called once per batch that could not be fetched. The sweep continues.
    async fn batch_failed(&self, _reason: &str) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub batches: usize,
    pub failed_batches: usize,
    pub pairs: usize,
    pub pacing_pauses: usize,
}

pub struct BatchPoller {
    source: Arc<dyn MarketDataSource>,
    config: PollerConfig,
}

impl BatchPoller {
    pub fn new(source: Arc<dyn MarketDataSource>, config: PollerConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Sweep the universe once. Every batch is handed to `sink` before this returns.
    pub async fn sweep(&self, universe: &[String], sink: &dyn BatchSink) -> SweepStats {
        let mut stats = SweepStats::default();
        if universe.is_empty() {
            debug!("Empty universe, nothing to poll");
            return stats;
        }

        let batch_size = self.config.batch_size.max(1);
        let budget = self.config.request_budget.max(1);
        let pacing = self.config.pacing_interval();

        let mut pending: JoinSet<Result<Vec<TokenPairSnapshot>, FeedError>> = JoinSet::new();
        let mut window_start = Instant::now();

        for batch in universe.chunks(batch_size) {
            let source = Arc::clone(&self.source);
            let batch = batch.to_vec();
            pending.spawn(async move { source.fetch_batch(&batch).await });
            stats.batches += 1;

            if pending.len() >= budget {
                Self::drain(&mut pending, sink, &mut stats).await;

                let elapsed = window_start.elapsed();
                if elapsed < pacing {
                    tokio::time::sleep(pacing - elapsed).await;
                    stats.pacing_pauses += 1;
                }
                window_start = Instant::now();
            }
        }

        Self::drain(&mut pending, sink, &mut stats).await;
        stats
    }

    async fn drain(
        pending: &mut JoinSet<Result<Vec<TokenPairSnapshot>, FeedError>>,
        sink: &dyn BatchSink,
        stats: &mut SweepStats,
    ) {
        while let Some(joined) = pending.join_next().await {
            match joined {
                Ok(Ok(pairs)) => {
                    stats.pairs += pairs.len();
                    sink.handle_batch(pairs).await;
                }
                Ok(Err(e)) => {
                    stats.failed_batches += 1;
                    warn!(error = %e, "Batch fetch failed");
                    sink.batch_failed(&e.to_string()).await;
                }
                Err(e) => {
                    stats.failed_batches += 1;
                    error!(error = %e, "Batch fetch task failed");
                    sink.batch_failed(&e.to_string()).await;
                }
            }
        }
    }

    /// Sweep forever, idling between sweeps, until `shutdown` flips to true.
    pub async fn run(
        &self,
        universe: &[String],
        sink: &dyn BatchSink,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!(
            addresses = universe.len(),
            batch_size = self.config.batch_size,
            budget = self.config.request_budget,
            "Poller started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let started = Instant::now();
            let stats = self.sweep(universe, sink).await;
            info!(
                batches = stats.batches,
                failed = stats.failed_batches,
                pairs = stats.pairs,
                pauses = stats.pacing_pauses,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Sweep complete"
            );

            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.idle()) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Poller stopped");
    }
}
