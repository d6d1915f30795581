//! File-based snapshot backend — one JSON file per snapshot kind.
//!
//! Storage location: `~/.dealerbot/data/{topics,greeted}.json`
//!
//! Each save writes a sibling temp file and renames it over the target, so a
//! crash mid-write leaves the previous snapshot readable.

use async_trait::async_trait;
use dealerbot_core::error::MemoryError;
use dealerbot_core::memory::{SnapshotKind, SnapshotStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, kind: SnapshotKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.as_str()))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self, kind: SnapshotKind) -> Result<Option<String>, MemoryError> {
        let path = self.path(kind);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                debug!(path = %path.display(), bytes = content.len(), "Snapshot file loaded");
                Ok(Some(content))
            }
            // Nothing saved yet
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MemoryError::Storage(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn save(&self, kind: SnapshotKind, payload: String) -> Result<(), MemoryError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            MemoryError::Storage(format!("Failed to create data directory: {e}"))
        })?;

        let path = self.path(kind);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, payload.as_bytes()).await.map_err(|e| {
            MemoryError::Storage(format!("Failed to write snapshot file: {e}"))
        })?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            MemoryError::Storage(format!("Failed to replace snapshot file: {e}"))
        })?;

        debug!(path = %path.display(), bytes = payload.len(), "Snapshot file written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ConversationStore, RetentionPolicy};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(tmp.path().join("nested"));

        assert!(store.load(SnapshotKind::Greeted).await.unwrap().is_none());

        store
            .save(SnapshotKind::Greeted, r#"{"version":1,"records":["u1"]}"#.into())
            .await
            .unwrap();
        let loaded = store.load(SnapshotKind::Greeted).await.unwrap();
        assert_eq!(loaded.as_deref(), Some(r#"{"version":1,"records":["u1"]}"#));
        assert!(store.load(SnapshotKind::Topics).await.unwrap().is_none());
        assert!(!store.path(SnapshotKind::Greeted).with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn greeting_persists_across_reopen() {
        let tmp = TempDir::new().unwrap();

        let backend = Arc::new(FileSnapshotStore::new(tmp.path()));
        let conversations = ConversationStore::open(RetentionPolicy::default(), backend).await;
        conversations.mark_greeted("62812@c.us").await;
        conversations.flush().await;

        let content = std::fs::read_to_string(tmp.path().join("greeted.json")).unwrap();
        assert!(content.contains("62812@c.us"));

        let backend = Arc::new(FileSnapshotStore::new(tmp.path()));
        let reopened = ConversationStore::open(RetentionPolicy::default(), backend).await;
        assert!(reopened.is_greeted("62812@c.us").await);
    }

    #[tokio::test]
    async fn handles_corrupted_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("topics.json"), "this is not json").unwrap();

        let backend = Arc::new(FileSnapshotStore::new(tmp.path()));
        let conversations = ConversationStore::open(RetentionPolicy::default(), backend).await;
        assert!(conversations.topics().await.is_empty());
    }

    #[tokio::test]
    async fn unwritable_directory_is_a_storage_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let store = FileSnapshotStore::new(blocker.join("data"));
        assert!(matches!(
            store.save(SnapshotKind::Topics, "{}".into()).await,
            Err(MemoryError::Storage(_))
        ));
    }
}
