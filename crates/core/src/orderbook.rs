//! Order book levels and spread rows.

use crate::venue::Venue;
use serde::{Deserialize, Serialize};

/// Maximum number of bid levels kept per venue.
pub const MAX_LEVELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    pub price: f64,
    pub size: f64,
}

impl OrderBookLevel {
    pub fn new(price: f64, size: f64) -> Self {
        Self { price, size }
    }

    /// Both price and size strictly positive.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.price > 0.0 && self.size > 0.0
    }

    /// Notional in quote currency.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.price * self.size
    }

    /// Percentage spread of this bid against a reference price.
    #[inline]
    pub fn spread_pct(&self, reference: f64) -> f64 {
        (self.price - reference) / self.price * 100.0
    }
}

/// A bid level annotated with its spread against the DEX price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadLevel {
    pub price: f64,
    pub notional: f64,
    pub spread_pct: f64,
}

impl SpreadLevel {
    pub fn from_level(level: &OrderBookLevel, reference: f64) -> Self {
        Self {
            price: level.price,
            notional: level.notional(),
            spread_pct: level.spread_pct(reference),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadRow {
    pub venue: Venue,
    pub levels: Vec<SpreadLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_validity() {
        assert!(OrderBookLevel::new(1.0, 2.0).is_valid());
        assert!(!OrderBookLevel::new(0.0, 2.0).is_valid());
        assert!(!OrderBookLevel::new(1.0, -1.0).is_valid());
    }

    #[test]
    fn test_spread() {
        let level = OrderBookLevel::new(1.10, 100.0);
        let spread = SpreadLevel::from_level(&level, 1.0);
        assert!((spread.spread_pct - 9.0909).abs() < 1e-3);
        assert!((spread.notional - 110.0).abs() < 1e-9);

        let below = OrderBookLevel::new(0.5, 1.0);
        assert!((below.spread_pct(1.0) + 100.0).abs() < 1e-9);
    }
}
