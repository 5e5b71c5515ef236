//! Application configuration.
//!
//! Tunables come from a JSON file where every section is optional.
//! Secrets come from the environment.

use dumper_alerts::{ChannelId, MachineConfig};
use dumper_engine::{ConfirmConfig, FilterConfig, GateConfig, PollerConfig};
use dumper_feeds::{load_universe, ApiCredentials, FeedError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Missing environment variable {0}")]
    MissingEnv(&'static str),
    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub poller: PollerConfig,
    pub filter: FilterConfig,
    pub gate: GateConfig,
    pub confirm: ConfirmConfig,
    pub alerts: AlertSettings,
    /// Quote asset for venue order books.
    pub quote: String,
    /// Bound on a single deposit status call.
    pub provider_timeout_secs: u64,
    pub universe_path: String,
    /// Contract address to Gate.io ticker, one `address / ticker` per line.
    pub gate_contracts_path: String,
    pub database_url: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poller: PollerConfig::default(),
            filter: FilterConfig::default(),
            gate: GateConfig::default(),
            confirm: ConfirmConfig::default(),
            alerts: AlertSettings::default(),
            quote: "USDT".to_string(),
            provider_timeout_secs: 15,
            universe_path: "universe.txt".to_string(),
            gate_contracts_path: "gate_contracts.txt".to_string(),
            database_url: "sqlite://dumper.db".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// `Ok(None)` when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }
}

/// Load the token universe. A missing or empty file is logged and yields an
/// empty universe, so sweeps keep running as no-ops. The error is returned
/// for the audit log.
pub fn universe_or_empty(path: &str) -> (Vec<String>, Option<FeedError>) {
    match load_universe(path) {
        Ok(universe) => (universe, None),
        Err(e) => {
            error!(path, error = %e, "Failed to load universe, polling an empty set");
            (Vec::new(), Some(e))
        }
    }
}

/// Alert delivery settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    /// Recent channel messages scanned for duplicates.
    pub dedup_window: usize,
    pub send_pause_ms: u64,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            dedup_window: 2,
            send_pause_ms: 1_000,
        }
    }
}

impl From<&AlertSettings> for MachineConfig {
    fn from(settings: &AlertSettings) -> Self {
        MachineConfig {
            dedup_window: settings.dedup_window,
            send_pause: Duration::from_millis(settings.send_pause_ms),
        }
    }
}

/// Credentials read from the environment.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub telegram_token: String,
    pub telegram_channel: ChannelId,
    pub mexc: ApiCredentials,
    pub bingx: ApiCredentials,
    pub dextools_key: String,
}

impl Secrets {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Telegram credentials are required; everything else defaults to empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingEnv(name))
        };
        let optional = |name: &str| lookup(name).unwrap_or_default();

        let telegram_token = required("TELEGRAM_BOT_TOKEN")?;
        let channel = required("TELEGRAM_CHANNEL_ID")?;
        let telegram_channel = channel
            .trim()
            .parse::<i64>()
            .map(ChannelId)
            .map_err(|_| ConfigError::InvalidEnv {
                name: "TELEGRAM_CHANNEL_ID",
                value: channel.clone(),
            })?;

        Ok(Self {
            telegram_token,
            telegram_channel,
            mexc: ApiCredentials::new(optional("MEXC_API_KEY"), optional("MEXC_SECRET_KEY")),
            bingx: ApiCredentials::new(optional("BINGX_API_KEY"), optional("BINGX_SECRET_KEY")),
            dextools_key: optional("DEXTOOLS_API_KEY"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.poller.batch_size, 30);
        assert_eq!(config.quote, "USDT");
        assert_eq!(config.provider_timeout(), Duration::from_secs(15));
        assert_eq!(MachineConfig::from(&config.alerts).dedup_window, 2);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"filter": {"m5_threshold": -3.0}, "poller": {"idle_secs": 10}, "quote": "USDC"}"#,
        )
        .unwrap();

        assert_eq!(config.filter.m5_threshold, -3.0);
        assert_eq!(config.filter.h1_threshold, -50.0);
        assert_eq!(config.poller.idle_secs, 10);
        assert_eq!(config.poller.request_budget, 295);
        assert_eq!(config.quote, "USDC");
        assert_eq!(config.gate, GateConfig::default());
    }

    #[test]
    fn test_missing_file() {
        assert!(AppConfig::load("/nonexistent/dumper.json").unwrap().is_none());
    }

    #[test]
    fn test_universe_missing_file_is_empty() {
        let (universe, err) = universe_or_empty("/nonexistent/universe.txt");
        assert!(universe.is_empty());
        assert!(matches!(err, Some(FeedError::Config(_))));
    }

    #[test]
    fn test_universe_blank_file_is_empty() {
        let path = std::env::temp_dir().join(format!("dumper-universe-{}.txt", std::process::id()));
        std::fs::write(&path, "\n   \n\n").unwrap();

        let (universe, err) = universe_or_empty(path.to_str().unwrap());
        std::fs::remove_file(&path).unwrap();

        assert!(universe.is_empty());
        assert!(matches!(err, Some(FeedError::Config(_))));
    }

    #[test]
    fn test_universe_loaded() {
        let path = std::env::temp_dir().join(format!("dumper-universe-ok-{}.txt", std::process::id()));
        std::fs::write(&path, "0xaaa\n\n 0xbbb \n").unwrap();

        let (universe, err) = universe_or_empty(path.to_str().unwrap());
        std::fs::remove_file(&path).unwrap();

        assert_eq!(universe, vec!["0xaaa".to_string(), "0xbbb".to_string()]);
        assert!(err.is_none());
    }

    #[test]
    fn test_secrets_require_telegram() {
        let err = Secrets::from_lookup(lookup(&[("TELEGRAM_BOT_TOKEN", "123:abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv("TELEGRAM_CHANNEL_ID")));

        let err = Secrets::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_CHANNEL_ID", "@channel"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn test_secrets_optional_venues() {
        let secrets = Secrets::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_CHANNEL_ID", "-1001234"),
            ("MEXC_API_KEY", "k"),
            ("MEXC_SECRET_KEY", "s"),
        ]))
        .unwrap();

        assert_eq!(secrets.telegram_channel, ChannelId(-1001234));
        assert!(secrets.mexc.is_configured());
        assert!(!secrets.bingx.is_configured());
        assert!(secrets.dextools_key.is_empty());
    }
}
