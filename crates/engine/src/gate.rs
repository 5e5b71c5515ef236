//! Liquidity gate applied before any enrichment call.

use dumper_core::TokenPairSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Both pool sides must exceed this, in USD.
    pub min_side_liquidity_usd: f64,
    pub disallowed_dexes: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_side_liquidity_usd: 15_000.0,
            disallowed_dexes: vec!["balancer".to_string(), "dedust".to_string()],
        }
    }
}

/// Pool split into token and native sides, in USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolSides {
    pub token_usd: f64,
    pub native_usd: f64,
}

impl PoolSides {
    pub fn of(snapshot: &TokenPairSnapshot) -> Self {
        Self {
            token_usd: snapshot.token_liquidity_usd(),
            native_usd: snapshot.native_liquidity_usd(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    ThinPool,
    DisallowedDex,
}

#[derive(Debug, Clone, Default)]
pub struct LiquidityGate {
    config: GateConfig,
}

impl LiquidityGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    pub fn check(&self, snapshot: &TokenPairSnapshot) -> Result<PoolSides, GateRejection> {
        if self
            .config
            .disallowed_dexes
            .iter()
            .any(|d| d.eq_ignore_ascii_case(&snapshot.dex_id))
        {
            return Err(GateRejection::DisallowedDex);
        }

        let sides = PoolSides::of(snapshot);
        let floor = self.config.min_side_liquidity_usd;
        if sides.native_usd > floor && sides.token_usd > floor {
            Ok(sides)
        } else {
            Err(GateRejection::ThinPool)
        }
    }
}
