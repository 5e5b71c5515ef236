//! SQLite persistence: message outbox, sent alerts and error log.

use crate::transport::{ChannelId, MessageHandle};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Alert row as stored in `sent_alerts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAlert {
    pub contract: String,
    pub channel: ChannelId,
    pub handle: MessageHandle,
    pub phase: String,
    pub sent_at: String,
}

/// Database connection for the alert pipeline.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to SQLite database at the given URL and run migrations.
    pub async fn connect(database_url: &str) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        // Each in-memory connection is its own database.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn run_migrations(&self) -> Result<(), DbError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS outbox (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                channel_id INTEGER NOT NULL,
                message_id INTEGER NOT NULL,
                text TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME,
                UNIQUE(channel_id, message_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sent_alerts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                contract TEXT NOT NULL,
                channel_id INTEGER NOT NULL,
                message_id INTEGER NOT NULL,
                phase TEXT NOT NULL DEFAULT 'sent',
                sent_at TEXT NOT NULL,
                updated_at TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_sent_alerts_contract
            ON sent_alerts(contract, id)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS error_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                message TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remember a message posted to a channel.
    pub async fn record_outbox(
        &self,
        channel: ChannelId,
        handle: MessageHandle,
        text: &str,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO outbox (channel_id, message_id, text)
            VALUES (?, ?, ?)
            ON CONFLICT(channel_id, message_id) DO UPDATE SET
                text = excluded.text,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(channel.0)
        .bind(handle.0)
        .bind(text)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Replace the stored text of an edited message.
    pub async fn update_outbox(
        &self,
        channel: ChannelId,
        handle: MessageHandle,
        text: &str,
    ) -> Result<bool, DbError> {
        let result = sqlx::query(
            "UPDATE outbox SET text = ?, updated_at = CURRENT_TIMESTAMP WHERE channel_id = ? AND message_id = ?",
        )
        .bind(text)
        .bind(channel.0)
        .bind(handle.0)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Text of the most recent messages in a channel, newest first.
    pub async fn recent_outbox(&self, channel: ChannelId, limit: usize) -> Result<Vec<String>, DbError> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT text FROM outbox WHERE channel_id = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(channel.0)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(text,)| text).collect())
    }

    /// Keep only the `keep` most recent outbox rows of a channel.
    pub async fn prune_outbox(&self, channel: ChannelId, keep: usize) -> Result<u64, DbError> {
        let result = sqlx::query(
            r#"
            DELETE FROM outbox WHERE channel_id = ? AND id NOT IN (
                SELECT id FROM outbox WHERE channel_id = ? ORDER BY id DESC LIMIT ?
            )
            "#,
        )
        .bind(channel.0)
        .bind(channel.0)
        .bind(keep as i64)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert_alert(
        &self,
        contract: &str,
        channel: ChannelId,
        handle: MessageHandle,
        sent_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO sent_alerts (contract, channel_id, message_id, phase, sent_at) VALUES (?, ?, ?, 'sent', ?)",
        )
        .bind(contract)
        .bind(channel.0)
        .bind(handle.0)
        .bind(sent_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn mark_alert_updated(
        &self,
        contract: &str,
        handle: MessageHandle,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        sqlx::query(
            "UPDATE sent_alerts SET phase = 'updated', updated_at = ? WHERE contract = ? AND message_id = ?",
        )
        .bind(updated_at.to_rfc3339())
        .bind(contract)
        .bind(handle.0)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Latest stored alert for a contract.
    pub async fn latest_alert(&self, contract: &str) -> Result<Option<StoredAlert>, DbError> {
        let row = sqlx::query_as::<_, (String, i64, i64, String, String)>(
            "SELECT contract, channel_id, message_id, phase, sent_at FROM sent_alerts WHERE contract = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(contract)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(contract, channel_id, message_id, phase, sent_at)| StoredAlert {
            contract,
            channel: ChannelId(channel_id),
            handle: MessageHandle(message_id),
            phase,
            sent_at,
        }))
    }

    pub async fn insert_error(&self, message: &str) -> Result<(), DbError> {
        sqlx::query("INSERT INTO error_log (message) VALUES (?)")
            .bind(message)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Most recent error messages, newest first.
    pub async fn recent_errors(&self, limit: usize) -> Result<Vec<String>, DbError> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT message FROM error_log ORDER BY id DESC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(m,)| m).collect())
    }
}
