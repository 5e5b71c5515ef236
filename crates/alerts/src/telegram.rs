//! Telegram channel transport.
//!
//! Every posted message is mirrored to the database outbox so the duplicate
//! scan can read back recent channel history across restarts.

use crate::db::Database;
use crate::transport::{AlertError, ChannelId, MessageHandle, NotificationTransport};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};
use tracing::{debug, warn};

/// Outbox rows kept per channel.
const OUTBOX_KEEP: usize = 100;

pub struct TelegramTransport {
    bot: Bot,
    db: Database,
}

impl TelegramTransport {
    pub fn new(token: &str, db: Database) -> Self {
        Self {
            bot: Bot::new(token),
            db,
        }
    }
}

#[async_trait]
impl NotificationTransport for TelegramTransport {
    async fn send(&self, channel: ChannelId, text: &str) -> Result<MessageHandle, AlertError> {
        let message = self
            .bot
            .send_message(ChatId(channel.0), text)
            .parse_mode(ParseMode::Html)
            .await?;
        let handle = MessageHandle(i64::from(message.id.0));

        self.db.record_outbox(channel, handle, text).await?;
        let pruned = self.db.prune_outbox(channel, OUTBOX_KEEP).await?;
        if pruned > 0 {
            debug!(channel = %channel, pruned, "Pruned outbox");
        }
        Ok(handle)
    }

    async fn update(&self, channel: ChannelId, handle: MessageHandle, text: &str) -> Result<(), AlertError> {
        let id = i32::try_from(handle.0).map_err(|_| AlertError::InvalidHandle(handle))?;
        self.bot
            .edit_message_text(ChatId(channel.0), MessageId(id), text)
            .parse_mode(ParseMode::Html)
            .await?;

        if !self.db.update_outbox(channel, handle, text).await? {
            warn!(channel = %channel, message_id = %handle, "Edited message missing from outbox");
        }
        Ok(())
    }

    async fn recent_messages(&self, channel: ChannelId, limit: usize) -> Result<Vec<String>, AlertError> {
        Ok(self.db.recent_outbox(channel, limit).await?)
    }
}
