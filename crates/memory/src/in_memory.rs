//! In-memory snapshot backend — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use dealerbot_core::error::MemoryError;
use dealerbot_core::memory::{SnapshotKind, SnapshotStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps the last saved payload per kind. Nothing survives the process.
pub struct InMemorySnapshotStore {
    snapshots: Arc<RwLock<HashMap<SnapshotKind, String>>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self {
            snapshots: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The payload last saved for `kind`.
    pub async fn snapshot(&self, kind: SnapshotKind) -> Option<String> {
        self.snapshots.read().await.get(&kind).cloned()
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn load(&self, kind: SnapshotKind) -> Result<Option<String>, MemoryError> {
        Ok(self.snapshot(kind).await)
    }

    async fn save(&self, kind: SnapshotKind, payload: String) -> Result<(), MemoryError> {
        self.snapshots.write().await.insert(kind, payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn kinds_are_kept_apart() {
        let store = InMemorySnapshotStore::new();
        store.save(SnapshotKind::Topics, "t".into()).await.unwrap();
        store.save(SnapshotKind::Greeted, "g".into()).await.unwrap();
        store.save(SnapshotKind::Greeted, "g2".into()).await.unwrap();

        assert_eq!(store.load(SnapshotKind::Topics).await.unwrap().as_deref(), Some("t"));
        assert_eq!(store.load(SnapshotKind::Greeted).await.unwrap().as_deref(), Some("g2"));
    }
}
