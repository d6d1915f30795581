//! Conversation memory for dealerbot.
//!
//! [`ConversationStore`] owns every customer's rolling history, remembered
//! topic and greeted flag. The last two are persisted through a
//! [`SnapshotStore`](dealerbot_core::SnapshotStore) backend.

pub mod file_backend;
pub mod in_memory;
pub mod snapshot;
pub mod store;
pub mod topic;

pub use file_backend::FileSnapshotStore;
pub use in_memory::InMemorySnapshotStore;
pub use snapshot::TopicRecord;
pub use store::{ConversationStore, RetentionPolicy};
pub use topic::{detect_topic, mentions_topic};
