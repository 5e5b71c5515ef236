//! Drop filter and per-cycle deduplication.

use dumper_core::{SeenKey, TokenPairSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Why a snapshot was not turned into an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 5m or 1h change missing.
    IncompleteData,
    BelowThreshold,
    ExcludedVenue,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Skip(SkipReason),
    /// `strict` candidates need secondary confirmation before sending.
    Alert { strict: bool },
}

impl Classification {
    pub fn is_alert(&self) -> bool {
        matches!(self, Classification::Alert { .. })
    }
}

/// Thresholds are percentages; a drop qualifies when strictly below them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub m5_threshold: f64,
    pub solana_m5_threshold: f64,
    pub h1_threshold: f64,
    /// DEX ids never alerted on outside Solana.
    pub excluded_dexes: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            m5_threshold: -1.0,
            solana_m5_threshold: -40.0,
            h1_threshold: -50.0,
            excluded_dexes: vec!["dedust".to_string()],
        }
    }
}

/// Symbol pairs already alerted within one batch result.
#[derive(Debug, Default)]
pub struct SeenSet {
    keys: HashSet<SeenKey>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &SeenKey) -> bool {
        self.keys.contains(key)
    }

    /// Returns false if the key was already present.
    pub fn insert(&mut self, key: SeenKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenFilter {
    config: FilterConfig,
}

impl TokenFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Classify a snapshot and record its key in `seen` when it qualifies.
    pub fn classify(&self, snapshot: &TokenPairSnapshot, seen: &mut SeenSet) -> Classification {
        let (Some(m5), Some(h1)) = (snapshot.change_m5, snapshot.change_h1) else {
            return Classification::Skip(SkipReason::IncompleteData);
        };

        let strict = snapshot.is_solana();
        if strict {
            if !(m5 < self.config.solana_m5_threshold || h1 < self.config.h1_threshold) {
                return Classification::Skip(SkipReason::BelowThreshold);
            }
        } else {
            if !(m5 < self.config.m5_threshold || h1 < self.config.h1_threshold) {
                return Classification::Skip(SkipReason::BelowThreshold);
            }
            if self.is_excluded(&snapshot.dex_id) {
                return Classification::Skip(SkipReason::ExcludedVenue);
            }
        }

        if !seen.insert(snapshot.seen_key()) {
            return Classification::Skip(SkipReason::Duplicate);
        }
        Classification::Alert { strict }
    }

    fn is_excluded(&self, dex_id: &str) -> bool {
        self.config
            .excluded_dexes
            .iter()
            .any(|d| d.eq_ignore_ascii_case(dex_id))
    }
}
