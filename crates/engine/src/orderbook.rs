//! Top-of-book bids on every venue with open deposits.

use dumper_core::{SpreadLevel, SpreadRow, Venue, MAX_LEVELS};
use dumper_feeds::VenueRegistry;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct OrderBookAggregator {
    registry: Arc<VenueRegistry>,
    quote: String,
}

impl OrderBookAggregator {
    pub fn new(registry: Arc<VenueRegistry>, quote: impl Into<String>) -> Self {
        Self {
            registry,
            quote: quote.into(),
        }
    }

    /// One row per venue that returned at least one valid bid, in input order.
    pub async fn aggregate(&self, enabled: &[(Venue, String)], reference_price: f64) -> Vec<SpreadRow> {
        let mut tasks = Vec::with_capacity(enabled.len());
        for (venue, ticker) in enabled {
            let provider = match self.registry.order_book(*venue) {
                Ok(provider) => provider,
                Err(e) => {
                    warn!(venue = %venue, error = %e, "Skipping venue");
                    continue;
                }
            };
            let symbol = format!("{}/{}", ticker, self.quote);
            let venue = *venue;
            tasks.push((
                venue,
                tokio::spawn(async move { provider.top_bids(&symbol).await }),
            ));
        }

        let (venues, handles): (Vec<Venue>, Vec<_>) = tasks.into_iter().unzip();
        let results = join_all(handles).await;

        let mut rows = Vec::new();
        for (venue, joined) in venues.into_iter().zip(results) {
            let bids = match joined {
                Ok(Ok(bids)) => bids,
                Ok(Err(e)) => {
                    warn!(venue = %venue, error = %e, "Order book fetch failed");
                    continue;
                }
                Err(e) => {
                    warn!(venue = %venue, error = %e, "Order book task failed");
                    continue;
                }
            };

            let levels: Vec<SpreadLevel> = bids
                .iter()
                .take(MAX_LEVELS)
                .filter(|level| {
                    let valid = level.is_valid();
                    if !valid {
                        warn!(venue = %venue, price = level.price, size = level.size, "Invalid bid level");
                    }
                    valid
                })
                .map(|level| SpreadLevel::from_level(level, reference_price))
                .collect();

            if levels.is_empty() {
                info!(venue = %venue, "No bids available");
                continue;
            }
            rows.push(SpreadRow { venue, levels });
        }

        debug!(requested = enabled.len(), rows = rows.len(), "Order book aggregation done");
        rows
    }
}
