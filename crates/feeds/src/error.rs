//! Error types for feed operations.

use dumper_core::Venue;
use thiserror::Error;

/// Errors that can occur while talking to a market-data or venue API.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Credentials not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Venue not supported: {0}")]
    UnsupportedVenue(Venue),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout(err.to_string())
        } else if err.is_decode() {
            FeedError::Parse(err.to_string())
        } else {
            FeedError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Parse(err.to_string())
    }
}

impl FeedError {
    /// Returns true if this error is transient and may succeed on the next cycle.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FeedError::Network(_) | FeedError::Timeout(_) | FeedError::Http { .. }
        )
    }

    /// Returns true if this error needs operator action.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            FeedError::NotConfigured(_) | FeedError::UnsupportedVenue(_) | FeedError::Config(_)
        )
    }
}
