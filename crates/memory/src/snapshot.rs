//! Versioned snapshot schema for the two durable facets.
//!
//! Payloads are JSON envelopes `{ "version": 1, "records": [...] }`. Topic
//! snapshots hold `{user_id, topic, set_at}` records, greeting snapshots hold
//! customer identifiers. An envelope with another version is discarded on load.

use chrono::{DateTime, Utc};
use dealerbot_core::error::MemoryError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_VERSION: u32 = 1;

/// One remembered topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    pub user_id: String,
    pub topic: String,
    pub set_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    records: Vec<T>,
}

pub fn encode<T: Serialize>(records: Vec<T>) -> Result<String, MemoryError> {
    serde_json::to_string(&Envelope {
        version: SNAPSHOT_VERSION,
        records,
    })
    .map_err(|e| MemoryError::Snapshot(format!("Failed to encode snapshot: {e}")))
}

pub fn decode<T: DeserializeOwned>(payload: &str) -> Result<Vec<T>, MemoryError> {
    let envelope: Envelope<T> = serde_json::from_str(payload)
        .map_err(|e| MemoryError::Snapshot(format!("Invalid snapshot: {e}")))?;
    if envelope.version != SNAPSHOT_VERSION {
        return Err(MemoryError::Snapshot(format!(
            "Unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
            envelope.version
        )));
    }
    Ok(envelope.records)
}
