//! Per-pair alert pipeline, driven by the batch poller.

use async_trait::async_trait;
use dumper_alerts::{
    render_alert, render_update, AlertError, AlertStateMachine, AuditSink, ChannelId, SendOutcome,
    UpdateOutcome,
};
use dumper_core::TokenPairSnapshot;
use dumper_engine::{
    BatchSink, Classification, Confirmation, DepositAggregator, GateRejection, LiquidityGate,
    OrderBookAggregator, SeenSet, SkipReason, StrictConfirmer, TokenFilter,
};
use dumper_feeds::ListingSource;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Alert delivery failed: {0}")]
    Alert(#[from] AlertError),
}

/// How far a single pair got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    Skipped(SkipReason),
    Gated(GateRejection),
    Unconfirmed,
    Duplicate,
    /// Sent without enrichment: no venue reported the contract.
    Sent,
    Enriched,
}

pub struct Pipeline {
    filter: TokenFilter,
    gate: LiquidityGate,
    confirmer: StrictConfirmer,
    listings: Arc<dyn ListingSource>,
    deposits: DepositAggregator,
    books: OrderBookAggregator,
    alerts: AlertStateMachine,
    audit: Arc<dyn AuditSink>,
    channel: ChannelId,
}

impl Pipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        filter: TokenFilter,
        gate: LiquidityGate,
        confirmer: StrictConfirmer,
        listings: Arc<dyn ListingSource>,
        deposits: DepositAggregator,
        books: OrderBookAggregator,
        alerts: AlertStateMachine,
        audit: Arc<dyn AuditSink>,
        channel: ChannelId,
    ) -> Self {
        Self {
            filter,
            gate,
            confirmer,
            listings,
            deposits,
            books,
            alerts,
            audit,
            channel,
        }
    }

    /// Classify, gate, confirm, send, then enrich in place.
    pub async fn process_pair(
        &self,
        snap: &TokenPairSnapshot,
        seen: &mut SeenSet,
    ) -> Result<PairOutcome, PipelineError> {
        let strict = match self.filter.classify(snap, seen) {
            Classification::Skip(reason) => return Ok(PairOutcome::Skipped(reason)),
            Classification::Alert { strict } => strict,
        };
        let contract = snap.base_address.as_str();

        if let Err(rejection) = self.gate.check(snap) {
            debug!(contract, pair = %snap.pair_label(), ?rejection, "Pair gated");
            return Ok(PairOutcome::Gated(rejection));
        }

        if strict && self.confirmer.confirm(snap).await != Confirmation::Confirmed {
            return Ok(PairOutcome::Unconfirmed);
        }

        let listings = match snap.chain() {
            Some(chain) => self.listings.listings(chain, contract).await.unwrap_or_else(|e| {
                warn!(contract, error = %e, "Listings unavailable");
                Vec::new()
            }),
            None => Vec::new(),
        };

        let text = render_alert(snap, &listings);
        if let SendOutcome::Duplicate = self.alerts.send(contract, &text, self.channel).await? {
            return Ok(PairOutcome::Duplicate);
        }

        let deposits = self.deposits.aggregate(contract).await;
        if deposits.is_empty() {
            info!(contract, "No venue lists the contract");
            return Ok(PairOutcome::Sent);
        }

        let enabled = deposits.enabled();
        let rows = if enabled.is_empty() {
            Vec::new()
        } else {
            self.books.aggregate(&enabled, snap.price_usd).await
        };

        let updated = render_update(&text, &deposits, &rows);
        match self.alerts.update(contract, &updated).await? {
            UpdateOutcome::Updated => Ok(PairOutcome::Enriched),
            UpdateOutcome::Skipped | UpdateOutcome::AlreadyUpdated => Ok(PairOutcome::Sent),
        }
    }

    async fn report(&self, contract: &str, e: &PipelineError) {
        error!(contract, error = %e, "Pair processing failed");
        self.record_error(&format!("{}: {}", contract, e)).await;
    }

    async fn record_error(&self, message: &str) {
        if let Err(audit_err) = self.audit.record_error(message).await {
            error!(error = %audit_err, "Failed to write error log");
        }
    }
}

#[async_trait]
impl BatchSink for Pipeline {
    async fn handle_batch(&self, pairs: Vec<TokenPairSnapshot>) {
        // One alert per symbol pair per batch result.
        let mut seen = SeenSet::new();
        let mut alerts = 0usize;

        for snap in &pairs {
            match self.process_pair(snap, &mut seen).await {
                Ok(PairOutcome::Sent | PairOutcome::Enriched) => alerts += 1,
                Ok(_) => {}
                Err(e) => self.report(&snap.base_address, &e).await,
            }
        }

        if alerts > 0 {
            info!(pairs = pairs.len(), alerts, "Batch processed");
        }
    }

    async fn batch_failed(&self, reason: &str) {
        self.record_error(&format!("batch fetch: {}", reason)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compact_str::CompactString;
    use dumper_alerts::{
        AlertRecord, MachineConfig, MessageHandle, NotificationTransport,
    };
    use dumper_core::{
        Chain, DepositStatus, MarketListing, OrderBookLevel, ProjectLinks, Venue,
    };
    use dumper_engine::{ConfirmConfig, FilterConfig, GateConfig, DEFAULT_PROVIDER_TIMEOUT};
    use dumper_feeds::{
        FeedError, OrderBookProvider, PriceChange, PriceChangeSource, StatusProvider, VenueRegistry,
    };
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    const CHANNEL: ChannelId = ChannelId(-100);

    #[derive(Default)]
    struct Channel {
        messages: Mutex<Vec<String>>,
        fail_sends: bool,
    }

    #[async_trait]
    impl NotificationTransport for Channel {
        async fn send(&self, _channel: ChannelId, text: &str) -> Result<MessageHandle, AlertError> {
            if self.fail_sends {
                return Err(AlertError::Transport("chat not found".into()));
            }
            let mut messages = self.messages.lock().unwrap();
            messages.push(text.to_string());
            Ok(MessageHandle(messages.len() as i64))
        }

        async fn update(&self, _channel: ChannelId, handle: MessageHandle, text: &str) -> Result<(), AlertError> {
            let mut messages = self.messages.lock().unwrap();
            let slot = messages
                .get_mut(handle.0 as usize - 1)
                .ok_or(AlertError::InvalidHandle(handle))?;
            *slot = text.to_string();
            Ok(())
        }

        async fn recent_messages(&self, _channel: ChannelId, limit: usize) -> Result<Vec<String>, AlertError> {
            let messages = self.messages.lock().unwrap();
            Ok(messages.iter().rev().take(limit).cloned().collect())
        }
    }

    #[derive(Default)]
    struct Audit {
        errors: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AuditSink for Audit {
        async fn record_sent(&self, _record: &AlertRecord) -> Result<(), AlertError> {
            Ok(())
        }

        async fn record_updated(&self, _record: &AlertRecord) -> Result<(), AlertError> {
            Ok(())
        }

        async fn record_error(&self, message: &str) -> Result<(), AlertError> {
            self.errors.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    struct FixedChange(Option<PriceChange>);

    #[async_trait]
    impl PriceChangeSource for FixedChange {
        async fn price_change(&self, _address: &str) -> Result<Option<PriceChange>, FeedError> {
            Ok(self.0)
        }
    }

    struct NoListings;

    #[async_trait]
    impl ListingSource for NoListings {
        async fn listings(&self, _chain: Chain, _address: &str) -> Result<Vec<MarketListing>, FeedError> {
            Err(FeedError::Http { status: 429, body: String::new() })
        }
    }

    struct OpenDeposits(Venue);

    #[async_trait]
    impl StatusProvider for OpenDeposits {
        fn venue(&self) -> Venue {
            self.0
        }

        async fn check_deposit(&self, _contract: &str) -> Result<Option<DepositStatus>, FeedError> {
            Ok(Some(DepositStatus::new(true, "DUMP")))
        }
    }

    struct Bids(Venue);

    #[async_trait]
    impl OrderBookProvider for Bids {
        fn venue(&self) -> Venue {
            self.0
        }

        async fn top_bids(&self, _symbol: &str) -> Result<Vec<OrderBookLevel>, FeedError> {
            Ok(vec![OrderBookLevel::new(1.2, 1000.0)])
        }
    }

    struct Harness {
        pipeline: Pipeline,
        channel: Arc<Channel>,
        audit: Arc<Audit>,
    }

    fn harness(channel: Channel, change: Option<PriceChange>, with_venue: bool) -> Harness {
        let channel = Arc::new(channel);
        let audit = Arc::new(Audit::default());

        let providers: Vec<Arc<dyn StatusProvider>> = if with_venue {
            vec![Arc::new(OpenDeposits(Venue::Mexc))]
        } else {
            Vec::new()
        };
        let mut registry = VenueRegistry::new();
        registry.register(Arc::new(Bids(Venue::Mexc)));

        let pipeline = Pipeline::new(
            TokenFilter::new(FilterConfig::default()),
            LiquidityGate::new(GateConfig::default()),
            StrictConfirmer::new(Arc::new(FixedChange(change)), ConfirmConfig::default()),
            Arc::new(NoListings),
            DepositAggregator::new(providers, DEFAULT_PROVIDER_TIMEOUT),
            OrderBookAggregator::new(Arc::new(registry), "USDT"),
            AlertStateMachine::new(channel.clone(), audit.clone(), MachineConfig::default()),
            audit.clone(),
            CHANNEL,
        );
        Harness {
            pipeline,
            channel,
            audit,
        }
    }

    /// Pool of 100k split evenly between token and native sides.
    fn pair(base: &str, chain_id: &str, m5: f64, h1: f64) -> TokenPairSnapshot {
        TokenPairSnapshot {
            base_symbol: CompactString::new(base),
            quote_symbol: CompactString::new("WETH"),
            base_address: format!("0x{}", base.to_lowercase()),
            pair_address: "0xpair".to_string(),
            chain_id: chain_id.to_string(),
            dex_id: "uniswap".to_string(),
            price_usd: 1.0,
            liquidity_usd: 100_000.0,
            liquidity_base: 50_000.0,
            change_m5: Some(m5),
            change_h1: Some(h1),
            url: String::new(),
            links: ProjectLinks::default(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_sent_then_enriched() {
        let h = harness(Channel::default(), None, true);
        let mut seen = SeenSet::new();

        let outcome = h
            .pipeline
            .process_pair(&pair("DUMP", "ethereum", -5.0, -10.0), &mut seen)
            .await
            .unwrap();

        assert_eq!(outcome, PairOutcome::Enriched);
        let messages = h.channel.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("0xdump"));
        assert!(messages[0].contains("MEXC      ✅"));
        assert!(messages[0].contains("<b>MEXC</b>"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_venues_sends_without_update() {
        let h = harness(Channel::default(), None, false);
        let outcome = h
            .pipeline
            .process_pair(&pair("DUMP", "ethereum", -5.0, -10.0), &mut SeenSet::new())
            .await
            .unwrap();

        assert_eq!(outcome, PairOutcome::Sent);
        assert!(!h.channel.messages.lock().unwrap()[0].contains("<pre>"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_thin_pool_gated_before_send() {
        let h = harness(Channel::default(), None, true);
        let mut thin = pair("THIN", "ethereum", -5.0, -10.0);
        thin.liquidity_base = 90_000.0;

        let outcome = h.pipeline.process_pair(&thin, &mut SeenSet::new()).await.unwrap();

        assert_eq!(outcome, PairOutcome::Gated(GateRejection::ThinPool));
        assert!(h.channel.messages.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_strict_candidate_needs_confirmation() {
        let diverged = harness(Channel::default(), Some(PriceChange { m5: -5.0, h1: -10.0 }), true);
        let outcome = diverged
            .pipeline
            .process_pair(&pair("BONK", "solana", -45.0, -10.0), &mut SeenSet::new())
            .await
            .unwrap();
        assert_eq!(outcome, PairOutcome::Unconfirmed);
        assert!(diverged.channel.messages.lock().unwrap().is_empty());

        let agreed = harness(Channel::default(), Some(PriceChange { m5: -44.0, h1: -10.5 }), true);
        let outcome = agreed
            .pipeline
            .process_pair(&pair("BONK", "solana", -45.0, -10.0), &mut SeenSet::new())
            .await
            .unwrap();
        assert_eq!(outcome, PairOutcome::Enriched);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_dedups_and_reports_errors() {
        let h = harness(Channel::default(), None, false);
        let batch = vec![
            pair("DUMP", "ethereum", -5.0, -10.0),
            pair("DUMP", "ethereum", -6.0, -10.0),
            pair("FLAT", "ethereum", 0.0, 0.0),
        ];
        h.pipeline.handle_batch(batch).await;
        assert_eq!(h.channel.messages.lock().unwrap().len(), 1);

        let failing = harness(
            Channel {
                fail_sends: true,
                ..Default::default()
            },
            None,
            false,
        );
        failing
            .pipeline
            .handle_batch(vec![pair("DUMP", "ethereum", -5.0, -10.0)])
            .await;
        let errors = failing.audit.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("0xdump: "));
    }

    #[tokio::test]
    async fn test_failed_batch_written_to_error_log() {
        let h = harness(Channel::default(), None, false);
        h.pipeline.batch_failed("HTTP 429: rate limited").await;

        assert_eq!(
            *h.audit.errors.lock().unwrap(),
            vec!["batch fetch: HTTP 429: rate limited".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_contract_already_in_channel_is_duplicate() {
        let h = harness(Channel::default(), None, false);
        h.channel
            .messages
            .lock()
            .unwrap()
            .push("earlier alert for 0xdump".to_string());

        let outcome = h
            .pipeline
            .process_pair(&pair("DUMP", "ethereum", -5.0, -10.0), &mut SeenSet::new())
            .await
            .unwrap();
        assert_eq!(outcome, PairOutcome::Duplicate);
    }
}
