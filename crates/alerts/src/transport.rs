//! Notification transport abstraction.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub i64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport-assigned id of a posted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle(pub i64);

impl fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),
    #[error("Database error: {0}")]
    Db(#[from] crate::db::DbError),
    #[error("Invalid message handle: {0}")]
    InvalidHandle(MessageHandle),
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Posts, edits and reads back channel messages.
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn send(&self, channel: ChannelId, text: &str) -> Result<MessageHandle, AlertError>;

    async fn update(&self, channel: ChannelId, handle: MessageHandle, text: &str) -> Result<(), AlertError>;

    /// Text of the `limit` most recent messages in the channel, newest first.
    async fn recent_messages(&self, channel: ChannelId, limit: usize) -> Result<Vec<String>, AlertError>;
}
