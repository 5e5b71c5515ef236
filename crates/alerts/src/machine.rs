//! Two-phase alert lifecycle: send once, then amend in place.
//!
//! `Unsent -> Sent -> Updated`. A contract with no record is Unsent.
//! Before sending, the most recent channel messages are scanned for the
//! contract address so restarts and overlapping sweeps do not double-post.

use crate::audit::AuditSink;
use crate::transport::{AlertError, ChannelId, MessageHandle, NotificationTransport};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Contract address → posted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRecord {
    pub contract: String,
    pub channel: ChannelId,
    pub handle: MessageHandle,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertPhase {
    Sent,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent(AlertRecord),
    /// The contract already appears in a recent channel message.
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// No record for the contract.
    Skipped,
    AlreadyUpdated,
}

#[derive(Debug, Clone)]
pub struct MachineConfig {
    /// How many recent channel messages the duplicate scan reads.
    pub dedup_window: usize,
    /// Pause after every successful send.
    pub send_pause: Duration,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            dedup_window: 2,
            send_pause: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone)]
struct TrackedAlert {
    record: AlertRecord,
    phase: AlertPhase,
}

pub struct AlertStateMachine {
    transport: Arc<dyn NotificationTransport>,
    audit: Arc<dyn AuditSink>,
    records: DashMap<String, TrackedAlert>,
    config: MachineConfig,
}

impl AlertStateMachine {
    pub fn new(
        transport: Arc<dyn NotificationTransport>,
        audit: Arc<dyn AuditSink>,
        config: MachineConfig,
    ) -> Self {
        Self {
            transport,
            audit,
            records: DashMap::new(),
            config,
        }
    }

    /// Post an alert unless the contract already appears in the recent window.
    pub async fn send(
        &self,
        contract: &str,
        text: &str,
        channel: ChannelId,
    ) -> Result<SendOutcome, AlertError> {
        let recent = self
            .transport
            .recent_messages(channel, self.config.dedup_window)
            .await?;
        if recent.iter().any(|message| message.contains(contract)) {
            info!(contract, channel = %channel, "Alert already in recent messages, skipping");
            return Ok(SendOutcome::Duplicate);
        }

        let handle = self.transport.send(channel, text).await?;
        let record = AlertRecord {
            contract: contract.to_string(),
            channel,
            handle,
            sent_at: Utc::now(),
        };

        // A later send for the same contract replaces the tracked record.
        self.records.insert(
            contract.to_string(),
            TrackedAlert {
                record: record.clone(),
                phase: AlertPhase::Sent,
            },
        );

        if let Err(e) = self.audit.record_sent(&record).await {
            error!(contract, error = %e, "Failed to audit sent alert");
        }
        info!(contract, channel = %channel, message_id = %handle, "Alert sent");

        tokio::time::sleep(self.config.send_pause).await;
        Ok(SendOutcome::Sent(record))
    }

    /// Replace the posted message text. Only a Sent record moves to Updated.
    pub async fn update(&self, contract: &str, text: &str) -> Result<UpdateOutcome, AlertError> {
        let record = match self.records.get(contract) {
            None => {
                debug!(contract, "No alert record, update skipped");
                return Ok(UpdateOutcome::Skipped);
            }
            Some(tracked) if tracked.phase == AlertPhase::Updated => {
                return Ok(UpdateOutcome::AlreadyUpdated);
            }
            Some(tracked) => tracked.record.clone(),
        };

        self.transport
            .update(record.channel, record.handle, text)
            .await?;

        if let Some(mut tracked) = self.records.get_mut(contract) {
            if tracked.record.handle == record.handle {
                tracked.phase = AlertPhase::Updated;
            }
        }

        if let Err(e) = self.audit.record_updated(&record).await {
            error!(contract, error = %e, "Failed to audit alert update");
        }
        info!(contract, message_id = %record.handle, "Alert updated");
        Ok(UpdateOutcome::Updated)
    }

    pub fn phase(&self, contract: &str) -> Option<AlertPhase> {
        self.records.get(contract).map(|t| t.phase)
    }

    pub fn record(&self, contract: &str) -> Option<AlertRecord> {
        self.records.get(contract).map(|t| t.record.clone())
    }

    pub fn tracked(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
pub(crate) mod mocks {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory channel: newest message last.
    #[derive(Default)]
    pub struct MemoryTransport {
        pub messages: Mutex<Vec<(ChannelId, MessageHandle, String)>>,
        pub sends: Mutex<usize>,
        pub updates: Mutex<usize>,
    }

    #[async_trait]
    impl NotificationTransport for MemoryTransport {
        async fn send(&self, channel: ChannelId, text: &str) -> Result<MessageHandle, AlertError> {
            let mut messages = self.messages.lock().unwrap();
            let handle = MessageHandle(messages.len() as i64 + 1);
            messages.push((channel, handle, text.to_string()));
            *self.sends.lock().unwrap() += 1;
            Ok(handle)
        }

        async fn update(
            &self,
            channel: ChannelId,
            handle: MessageHandle,
            text: &str,
        ) -> Result<(), AlertError> {
            let mut messages = self.messages.lock().unwrap();
            let entry = messages
                .iter_mut()
                .find(|(c, h, _)| *c == channel && *h == handle)
                .ok_or(AlertError::InvalidHandle(handle))?;
            entry.2 = text.to_string();
            *self.updates.lock().unwrap() += 1;
            Ok(())
        }

        async fn recent_messages(
            &self,
            channel: ChannelId,
            limit: usize,
        ) -> Result<Vec<String>, AlertError> {
            let messages = self.messages.lock().unwrap();
            Ok(messages
                .iter()
                .rev()
                .filter(|(c, _, _)| *c == channel)
                .take(limit)
                .map(|(_, _, text)| text.clone())
                .collect())
        }
    }

    #[derive(Default)]
    pub struct MemoryAudit {
        pub sent: Mutex<Vec<AlertRecord>>,
        pub updated: Mutex<Vec<AlertRecord>>,
        pub errors: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AuditSink for MemoryAudit {
        async fn record_sent(&self, record: &AlertRecord) -> Result<(), AlertError> {
            self.sent.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn record_updated(&self, record: &AlertRecord) -> Result<(), AlertError> {
            self.updated.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn record_error(&self, message: &str) -> Result<(), AlertError> {
            self.errors.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::{MemoryAudit, MemoryTransport};
    use super::*;
    use crate::db::Database;
    use pretty_assertions::assert_eq;

    const CHANNEL: ChannelId = ChannelId(-1001);

    fn machine() -> (AlertStateMachine, Arc<MemoryTransport>, Arc<MemoryAudit>) {
        let transport = Arc::new(MemoryTransport::default());
        let audit = Arc::new(MemoryAudit::default());
        let machine = AlertStateMachine::new(transport.clone(), audit.clone(), MachineConfig::default());
        (machine, transport, audit)
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_twice_is_duplicate() {
        let (machine, transport, audit) = machine();

        let first = machine.send("0xabc", "alert for 0xabc", CHANNEL).await.unwrap();
        assert!(matches!(first, SendOutcome::Sent(_)));
        let second = machine.send("0xabc", "alert for 0xabc", CHANNEL).await.unwrap();
        assert_eq!(second, SendOutcome::Duplicate);

        assert_eq!(*transport.sends.lock().unwrap(), 1);
        assert_eq!(audit.sent.lock().unwrap().len(), 1);
        assert_eq!(machine.phase("0xabc"), Some(AlertPhase::Sent));
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_window_is_bounded() {
        let (machine, transport, _) = machine();

        machine.send("0xaaa", "alert 0xaaa", CHANNEL).await.unwrap();
        machine.send("0xbbb", "alert 0xbbb", CHANNEL).await.unwrap();
        machine.send("0xccc", "alert 0xccc", CHANNEL).await.unwrap();

        // 0xaaa fell out of the last two messages.
        let again = machine.send("0xaaa", "alert 0xaaa", CHANNEL).await.unwrap();
        assert!(matches!(again, SendOutcome::Sent(_)));
        assert_eq!(*transport.sends.lock().unwrap(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_pauses() {
        let (machine, _, _) = machine();
        let start = tokio::time::Instant::now();
        machine.send("0xabc", "alert", CHANNEL).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_lifecycle() {
        let (machine, transport, audit) = machine();

        assert_eq!(
            machine.update("0xabc", "enriched").await.unwrap(),
            UpdateOutcome::Skipped
        );

        let SendOutcome::Sent(record) = machine.send("0xabc", "alert 0xabc", CHANNEL).await.unwrap() else {
            panic!("expected Sent");
        };
        assert_eq!(
            machine.update("0xabc", "alert 0xabc + deposits").await.unwrap(),
            UpdateOutcome::Updated
        );
        assert_eq!(machine.phase("0xabc"), Some(AlertPhase::Updated));
        assert_eq!(
            machine.update("0xabc", "again").await.unwrap(),
            UpdateOutcome::AlreadyUpdated
        );

        let messages = transport.messages.lock().unwrap();
        assert_eq!(messages[0].1, record.handle);
        assert_eq!(messages[0].2, "alert 0xabc + deposits");
        assert_eq!(*transport.updates.lock().unwrap(), 1);
        assert_eq!(audit.updated.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_audit_to_database() {
        let db = Arc::new(Database::connect("sqlite::memory:").await.unwrap());
        let transport = Arc::new(MemoryTransport::default());
        let machine = AlertStateMachine::new(transport, db.clone(), MachineConfig::default());

        machine.send("0xdef", "alert 0xdef", CHANNEL).await.unwrap();
        machine.update("0xdef", "alert 0xdef v2").await.unwrap();

        let stored = db.latest_alert("0xdef").await.unwrap().unwrap();
        assert_eq!(stored.channel, CHANNEL);
        assert_eq!(stored.phase, "updated");
    }
}
