//! Snapshot trait — durable storage for conversation facets.
//!
//! Two facets of per-customer state outlive the process: the remembered
//! topic and the greeted flag. Each is stored as one serialized collection,
//! addressed by [`SnapshotKind`]. The schema of the payload belongs to the
//! conversation store; backends only move strings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::MemoryError;

/// Which persisted collection a snapshot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    /// `{user_id, topic, set_at}` records
    Topics,
    /// Identifiers of customers who received the introduction
    Greeted,
}

impl SnapshotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Topics => "topics",
            Self::Greeted => "greeted",
        }
    }
}

/// The core SnapshotStore trait.
///
/// Implementations: JSON files on disk, in-memory (for testing).
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// The backend name (e.g., "file", "in_memory").
    fn name(&self) -> &str;

    /// Load the last saved payload, `None` when nothing was ever saved.
    async fn load(&self, kind: SnapshotKind) -> std::result::Result<Option<String>, MemoryError>;

    /// Replace the saved payload.
    async fn save(&self, kind: SnapshotKind, payload: String) -> std::result::Result<(), MemoryError>;
}
