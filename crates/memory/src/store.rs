//! Conversation store — per-customer history, topic and greeting state.
//!
//! One instance per process, shared by reference between message handlers.
//! Every operation takes a single lock for its whole read-modify-write, so a
//! trim-then-append or a greeted check-then-set can never interleave with
//! another handler.
//!
//! History lives only in memory. Topics and the greeted set are written
//! through to a [`SnapshotStore`] on every change. Writes are encoded under
//! the lock and queued to a background task in order; a failed write is
//! logged and the in-memory state stays authoritative. Call
//! [`flush`](ConversationStore::flush) before shutdown to wait for the queue.

use chrono::{DateTime, TimeDelta, Utc};
use dealerbot_config::MemoryConfig;
use dealerbot_core::error::MemoryError;
use dealerbot_core::memory::{SnapshotKind, SnapshotStore};
use dealerbot_core::message::{ConversationTurn, Role};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, info, warn};

use crate::snapshot::{self, TopicRecord};
use crate::topic::detect_topic;

/// Retention windows and caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Turns older than this are dropped on every access
    pub history_window: TimeDelta,
    /// Most recent turns kept after the age trim
    pub max_history: usize,
    /// A topic older than this is no longer reported
    pub topic_window: TimeDelta,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::from(&MemoryConfig::default())
    }
}

impl From<&MemoryConfig> for RetentionPolicy {
    fn from(config: &MemoryConfig) -> Self {
        Self {
            history_window: TimeDelta::from_std(config.history_window()).unwrap_or(TimeDelta::MAX),
            max_history: config.max_history,
            topic_window: TimeDelta::from_std(config.topic_window()).unwrap_or(TimeDelta::MAX),
        }
    }
}

#[derive(Debug, Clone)]
struct Topic {
    value: String,
    set_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    history: HashMap<String, Vec<ConversationTurn>>,
    topics: HashMap<String, Topic>,
    greeted: BTreeSet<String>,
}

impl State {
    fn topic_records(&self) -> Vec<TopicRecord> {
        let mut records: Vec<TopicRecord> = self
            .topics
            .iter()
            .map(|(user_id, topic)| TopicRecord {
                user_id: user_id.clone(),
                topic: topic.value.clone(),
                set_at: topic.set_at,
            })
            .collect();
        records.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        records
    }

    fn topics_payload(&self) -> Result<String, MemoryError> {
        snapshot::encode(self.topic_records())
    }

    fn greeted_payload(&self) -> Result<String, MemoryError> {
        snapshot::encode(self.greeted.iter().cloned().collect())
    }
}

enum WriteOp {
    Save(SnapshotKind, String),
    Flush(oneshot::Sender<()>),
}

/// Drain the write queue until every sender is gone.
async fn run_writer(backend: Arc<dyn SnapshotStore>, mut rx: mpsc::UnboundedReceiver<WriteOp>) {
    while let Some(op) = rx.recv().await {
        match op {
            WriteOp::Save(kind, payload) => match backend.save(kind, payload).await {
                Ok(()) => debug!(backend = backend.name(), kind = kind.as_str(), "Snapshot saved"),
                Err(e) => warn!(
                    backend = backend.name(),
                    kind = kind.as_str(),
                    error = %e,
                    "Snapshot write failed; in-memory state kept"
                ),
            },
            WriteOp::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

/// Load and decode one snapshot, discarding it when unreadable.
async fn load_records<T: serde::de::DeserializeOwned>(
    backend: &dyn SnapshotStore,
    kind: SnapshotKind,
) -> Vec<T> {
    let payload = match backend.load(kind).await {
        Ok(Some(payload)) => payload,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(backend = backend.name(), kind = kind.as_str(), error = %e, "Snapshot load failed");
            return Vec::new();
        }
    };

    match snapshot::decode(&payload) {
        Ok(records) => records,
        Err(e) => {
            warn!(kind = kind.as_str(), error = %e, "Discarding snapshot");
            Vec::new()
        }
    }
}

pub struct ConversationStore {
    policy: RetentionPolicy,
    state: Mutex<State>,
    writer: mpsc::UnboundedSender<WriteOp>,
}

impl ConversationStore {
    /// Load both snapshots and start the background writer.
    ///
    /// Must be called inside a Tokio runtime.
    pub async fn open(policy: RetentionPolicy, backend: Arc<dyn SnapshotStore>) -> Self {
        let mut state = State::default();

        for record in load_records::<TopicRecord>(backend.as_ref(), SnapshotKind::Topics).await {
            state.topics.insert(
                record.user_id,
                Topic {
                    value: record.topic,
                    set_at: record.set_at,
                },
            );
        }
        state.greeted = load_records::<String>(backend.as_ref(), SnapshotKind::Greeted)
            .await
            .into_iter()
            .collect();

        info!(
            backend = backend.name(),
            topics = state.topics.len(),
            greeted = state.greeted.len(),
            "Conversation store opened"
        );

        let (writer, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(backend, rx));

        Self {
            policy,
            state: Mutex::new(state),
            writer,
        }
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    fn persist(&self, kind: SnapshotKind, payload: Result<String, MemoryError>) {
        match payload {
            Ok(payload) => {
                if self.writer.send(WriteOp::Save(kind, payload)).is_err() {
                    warn!(kind = kind.as_str(), "Snapshot writer stopped; change not persisted");
                }
            }
            Err(e) => warn!(kind = kind.as_str(), error = %e, "Snapshot not encoded"),
        }
    }

    fn trim(&self, turns: &mut Vec<ConversationTurn>, now: DateTime<Utc>) {
        turns.retain(|turn| now - turn.created_at <= self.policy.history_window);
        if turns.len() > self.policy.max_history {
            turns.drain(..turns.len() - self.policy.max_history);
        }
    }

    /// Recent turns for a customer, oldest first.
    pub async fn history(&self, user_id: &str) -> Vec<ConversationTurn> {
        self.history_at(user_id, Utc::now()).await
    }

    pub async fn history_at(&self, user_id: &str, now: DateTime<Utc>) -> Vec<ConversationTurn> {
        let mut state = self.state.lock().await;
        match state.history.get_mut(user_id) {
            Some(turns) => {
                self.trim(turns, now);
                turns.clone()
            }
            None => Vec::new(),
        }
    }

    /// Record a turn. A turn naming a model also sets the topic.
    pub async fn append_turn(&self, user_id: &str, role: Role, content: &str) {
        self.append_turn_at(user_id, role, content, Utc::now()).await;
    }

    pub async fn append_turn_at(&self, user_id: &str, role: Role, content: &str, now: DateTime<Utc>) {
        let mut state = self.state.lock().await;

        let turns = state.history.entry(user_id.to_string()).or_default();
        turns.push(ConversationTurn::new(role, content, now));
        self.trim(turns, now);

        let Some(topic) = detect_topic(content) else {
            return;
        };

        debug!(user = %user_id, topic, "Topic set");
        state.topics.insert(
            user_id.to_string(),
            Topic {
                value: topic.to_string(),
                set_at: now,
            },
        );
        self.persist(SnapshotKind::Topics, state.topics_payload());
    }

    /// The remembered topic, while it is younger than the topic window.
    pub async fn topic(&self, user_id: &str) -> Option<String> {
        self.topic_at(user_id, Utc::now()).await
    }

    pub async fn topic_at(&self, user_id: &str, now: DateTime<Utc>) -> Option<String> {
        let state = self.state.lock().await;
        state
            .topics
            .get(user_id)
            .filter(|topic| now - topic.set_at <= self.policy.topic_window)
            .map(|topic| topic.value.clone())
    }

    pub async fn is_greeted(&self, user_id: &str) -> bool {
        self.state.lock().await.greeted.contains(user_id)
    }

    /// Mark a customer greeted. Returns `true` only for the call that added them.
    pub async fn mark_greeted(&self, user_id: &str) -> bool {
        let mut state = self.state.lock().await;
        if !state.greeted.insert(user_id.to_string()) {
            return false;
        }
        info!(user = %user_id, "Customer marked as greeted");
        self.persist(SnapshotKind::Greeted, state.greeted_payload());
        true
    }

    /// Forget the greeting for one customer, or for everyone with `None`.
    ///
    /// Returns how many customers were reset.
    pub async fn reset_greeting(&self, user_id: Option<&str>) -> usize {
        let mut state = self.state.lock().await;
        let removed = match user_id {
            Some(id) => usize::from(state.greeted.remove(id)),
            None => {
                let count = state.greeted.len();
                state.greeted.clear();
                count
            }
        };
        if removed > 0 {
            info!(user = user_id.unwrap_or("*"), removed, "Greeting reset");
            self.persist(SnapshotKind::Greeted, state.greeted_payload());
        }
        removed
    }

    /// Drop a customer's history. Topic and greeting are kept.
    pub async fn clear_history(&self, user_id: &str) {
        self.state.lock().await.history.remove(user_id);
    }

    /// Customers with a remembered topic, fresh or not, sorted by identifier.
    pub async fn topics(&self) -> Vec<TopicRecord> {
        self.state.lock().await.topic_records()
    }

    /// Wait until every queued snapshot write has been attempted.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.writer.send(WriteOp::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }
}
