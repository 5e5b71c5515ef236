//! Alert delivery for the dump screener.
//!
//! This crate provides:
//! - The two-phase alert state machine (send, then update in place)
//! - Telegram transport with a persisted outbox for duplicate scans
//! - SQLite audit log of sent alerts and swallowed errors
//! - HTML rendering of alerts, deposit tables and bid spreads

pub mod audit;
pub mod db;
pub mod machine;
pub mod render;
pub mod telegram;
pub mod transport;

pub use audit::AuditSink;
pub use db::{Database, DbError, StoredAlert};
pub use machine::{AlertPhase, AlertRecord, AlertStateMachine, MachineConfig, SendOutcome, UpdateOutcome};
pub use render::{render_alert, render_update};
pub use telegram::TelegramTransport;
pub use transport::{AlertError, ChannelId, MessageHandle, NotificationTransport};
