//! Venue registry: order book providers keyed by venue.
//!
//! Built once at startup and shared by the order book aggregator.

use crate::error::FeedError;
use crate::orderbook::{OrderBookProvider, RestDepthProvider};
use dumper_core::Venue;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default, Clone)]
pub struct VenueRegistry {
    books: HashMap<Venue, Arc<dyn OrderBookProvider>>,
}

impl VenueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a REST depth provider for every known venue.
    pub fn with_rest_providers(client: &Client) -> Self {
        let mut registry = Self::new();
        for venue in Venue::all() {
            registry.register(Arc::new(RestDepthProvider::new(*venue, client.clone())));
        }
        registry
    }

    /// Register a provider under its own venue, replacing any previous one.
    pub fn register(&mut self, provider: Arc<dyn OrderBookProvider>) {
        self.books.insert(provider.venue(), provider);
    }

    pub fn order_book(&self, venue: Venue) -> Result<Arc<dyn OrderBookProvider>, FeedError> {
        self.books
            .get(&venue)
            .cloned()
            .ok_or(FeedError::UnsupportedVenue(venue))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl std::fmt::Debug for VenueRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut venues: Vec<Venue> = self.books.keys().copied().collect();
        venues.sort();
        f.debug_struct("VenueRegistry").field("venues", &venues).finish()
    }
}
