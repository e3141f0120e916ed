//! Core types for the notification layer.

use crate::error::NotificationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Domain category of a platform event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    /// Fallback for wire keys that match nothing in the catalog.
    Unknown,
    ProjectCreated,
    ProjectDeleted,
    ProjectLinked,
    ProjectLocked,
    ProjectUnlinked,
    ProjectUnlocked,
    ProjectUpdated,
    BlockchainLogProcessed,
    MessageProcessed,
    PlayerCreated,
    PlayerDeleted,
    PlayerLinked,
    PlayerUnlinked,
    PlayerUpdated,
    AssetCreated,
    AssetMelted,
    AssetMinted,
    AssetTransferred,
    AssetUpdated,
    TradeCompleted,
    TradeCreated,
    TransactionBroadcast,
    TransactionCanceled,
    TransactionDropped,
    TransactionExecuted,
    TransactionFailed,
    TransactionPending,
    TransactionProcessing,
    TransactionUpdated,
}

impl EventCategory {
    /// Human name, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Unknown => "UNKNOWN",
            EventCategory::ProjectCreated => "PROJECT_CREATED",
            EventCategory::ProjectDeleted => "PROJECT_DELETED",
            EventCategory::ProjectLinked => "PROJECT_LINKED",
            EventCategory::ProjectLocked => "PROJECT_LOCKED",
            EventCategory::ProjectUnlinked => "PROJECT_UNLINKED",
            EventCategory::ProjectUnlocked => "PROJECT_UNLOCKED",
            EventCategory::ProjectUpdated => "PROJECT_UPDATED",
            EventCategory::BlockchainLogProcessed => "BLOCKCHAIN_LOG_PROCESSED",
            EventCategory::MessageProcessed => "MESSAGE_PROCESSED",
            EventCategory::PlayerCreated => "PLAYER_CREATED",
            EventCategory::PlayerDeleted => "PLAYER_DELETED",
            EventCategory::PlayerLinked => "PLAYER_LINKED",
            EventCategory::PlayerUnlinked => "PLAYER_UNLINKED",
            EventCategory::PlayerUpdated => "PLAYER_UPDATED",
            EventCategory::AssetCreated => "ASSET_CREATED",
            EventCategory::AssetMelted => "ASSET_MELTED",
            EventCategory::AssetMinted => "ASSET_MINTED",
            EventCategory::AssetTransferred => "ASSET_TRANSFERRED",
            EventCategory::AssetUpdated => "ASSET_UPDATED",
            EventCategory::TradeCompleted => "TRADE_COMPLETED",
            EventCategory::TradeCreated => "TRADE_CREATED",
            EventCategory::TransactionBroadcast => "TRANSACTION_BROADCAST",
            EventCategory::TransactionCanceled => "TRANSACTION_CANCELED",
            EventCategory::TransactionDropped => "TRANSACTION_DROPPED",
            EventCategory::TransactionExecuted => "TRANSACTION_EXECUTED",
            EventCategory::TransactionFailed => "TRANSACTION_FAILED",
            EventCategory::TransactionPending => "TRANSACTION_PENDING",
            EventCategory::TransactionProcessing => "TRANSACTION_PROCESSING",
            EventCategory::TransactionUpdated => "TRANSACTION_UPDATED",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, EventCategory::Unknown)
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = NotificationError;

    /// Parses a human name. Unlike registry lookups this does not fall back
    /// to `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let def = crate::events::lookup_by_name(s);
        if def.category.is_unknown() && s != EventCategory::Unknown.as_str() {
            return Err(NotificationError::UnknownCategory(s.to_string()));
        }
        Ok(def.category)
    }
}

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a registered listener, used for deduplication.
///
/// Generated ids never equal a caller-chosen id, whatever the caller's
/// string looks like.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(Identity);

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
enum Identity {
    Named(String),
    Generated(u64),
}

impl ListenerId {
    /// Caller-chosen identity.
    pub fn new(id: impl Into<String>) -> Self {
        ListenerId(Identity::Named(id.into()))
    }

    /// Process-unique generated identity.
    pub fn unique() -> Self {
        ListenerId(Identity::Generated(
            NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed),
        ))
    }

    /// The caller-chosen name, or None for a generated id.
    pub fn name(&self) -> Option<&str> {
        match &self.0 {
            Identity::Named(name) => Some(name),
            Identity::Generated(_) => None,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self.0, Identity::Generated(_))
    }
}

impl fmt::Debug for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListenerId({})", self)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Identity::Named(name) => f.write_str(name),
            Identity::Generated(n) => write!(f, "#{}", n),
        }
    }
}

impl From<&str> for ListenerId {
    fn from(s: &str) -> Self {
        ListenerId::new(s)
    }
}

impl From<String> for ListenerId {
    fn from(s: String) -> Self {
        ListenerId::new(s)
    }
}

/// A typed notification built from one inbound wire event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    category: EventCategory,
    channel: String,
    raw_payload: String,
}

impl NotificationEvent {
    pub fn new(
        category: EventCategory,
        channel: impl Into<String>,
        raw_payload: impl Into<String>,
    ) -> Self {
        Self {
            category,
            channel: channel.into(),
            raw_payload: raw_payload.into(),
        }
    }

    pub fn category(&self) -> EventCategory {
        self.category
    }

    /// Topic the event arrived on.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Payload exactly as delivered by the transport.
    pub fn raw_payload(&self) -> &str {
        &self.raw_payload
    }

    /// Parse the payload as JSON.
    pub fn payload_json(&self) -> Result<serde_json::Value, NotificationError> {
        Ok(serde_json::from_str(&self.raw_payload)?)
    }
}
