pub mod catalog;
pub mod conversations;
pub mod prompt;
pub mod status;

use dealerbot_config::AppConfig;
use dealerbot_memory::{ConversationStore, FileSnapshotStore, RetentionPolicy};
use std::sync::Arc;

pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    tracing::debug!(workbook = %config.catalog.workbook.display(), "Config loaded");
    Ok(config)
}

/// Open the conversation store over the configured data directory.
pub async fn open_store(config: &AppConfig) -> ConversationStore {
    let backend = Arc::new(FileSnapshotStore::new(&config.memory.data_dir));
    ConversationStore::open(RetentionPolicy::from(&config.memory), backend).await
}
