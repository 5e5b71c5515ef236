//! Append-only audit trail of sent alerts and pipeline errors.

use crate::db::Database;
use crate::machine::AlertRecord;
use crate::transport::AlertError;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record_sent(&self, record: &AlertRecord) -> Result<(), AlertError>;

    async fn record_updated(&self, record: &AlertRecord) -> Result<(), AlertError>;

    async fn record_error(&self, message: &str) -> Result<(), AlertError>;
}

#[async_trait]
impl AuditSink for Database {
    async fn record_sent(&self, record: &AlertRecord) -> Result<(), AlertError> {
        self.insert_alert(&record.contract, record.channel, record.handle, record.sent_at)
            .await?;
        Ok(())
    }

    async fn record_updated(&self, record: &AlertRecord) -> Result<(), AlertError> {
        self.mark_alert_updated(&record.contract, record.handle, Utc::now())
            .await?;
        Ok(())
    }

    async fn record_error(&self, message: &str) -> Result<(), AlertError> {
        self.insert_error(message).await?;
        Ok(())
    }
}
