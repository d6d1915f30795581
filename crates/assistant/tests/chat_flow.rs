//! End-to-end tests for the dealerbot chat pipeline.
//!
//! These tests drive a message from the inbound channel to the outbound
//! sends: workbook decoding, topic injection, prompt assembly, reply cleanup
//! and attachment dispatch.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dealerbot_assistant::{Assistant, Handled};
use dealerbot_catalog::{AssetLibrary, Catalog, JsonWorkbook};
use dealerbot_config::{AppConfig, CatalogConfig};
use dealerbot_core::channel::{Channel, InboundMessage};
use dealerbot_core::error::{ChannelError, ProviderError};
use dealerbot_core::message::{ConversationTurn, Role};
use dealerbot_core::provider::Provider;
use dealerbot_memory::{ConversationStore, InMemorySnapshotStore, RetentionPolicy};
use tempfile::TempDir;

// ── Mock Provider ────────────────────────────────────────────────────────

/// Returns scripted replies in sequence and records what it was asked.
struct ScriptedProvider {
    replies: Mutex<Vec<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<(String, usize)>>,
    latency: Duration,
}

impl ScriptedProvider {
    fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            prompts: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
        }
    }

    fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn text(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    /// (prompt, history length) per call
    fn calls(&self) -> Vec<(String, usize)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        prompt: &str,
        history: &[ConversationTurn],
    ) -> Result<String, ProviderError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), history.len()));
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            panic!("ScriptedProvider exhausted");
        }
        replies.remove(0)
    }
}

// ── Recording Channel ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Sent {
    Text(String),
    File { name: String, caption: String },
}

#[derive(Default)]
struct RecordingChannel {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingChannel {
    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send_text(&self, _destination: &str, text: &str) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(Sent::Text(text.to_string()));
        Ok(())
    }

    async fn send_attachment(
        &self,
        _destination: &str,
        caption: &str,
        attachment: &Path,
    ) -> Result<(), ChannelError> {
        let name = attachment
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.sent.lock().unwrap().push(Sent::File {
            name,
            caption: caption.to_string(),
        });
        Ok(())
    }
}

// ── Fixture ──────────────────────────────────────────────────────────────

const WORKBOOK: &str = r#"{
  "sheets": [
    { "name": "BEAT", "rows": [
        ["TIPE", "OTR", "DP", "TENOR"],
        ["", "", "", 11, 23],
        ["Beat Street", "19.500.000", "2.000.000", "1.650.000", "1.010.000"]
    ] },
    { "name": "DATA_STOK", "rows": [
        ["TAHUN", "KODE KE 2", "WARNA", "TOTAL"],
        [2025, "BEAT STREET", "BK", 4],
        ["", "", "WH", 0],
        ["2025 Total", "", "", 4]
    ] }
  ]
}"#;

struct Fixture {
    _root: TempDir,
    provider: Arc<ScriptedProvider>,
    store: Arc<ConversationStore>,
    assistant: Assistant,
}

async fn fixture(provider: ScriptedProvider) -> Fixture {
    let mut config = AppConfig::default();
    config.assets.attachment_delay_ms = 0;
    fixture_with(provider, &config).await
}

async fn fixture_with(provider: ScriptedProvider, config: &AppConfig) -> Fixture {
    let root = TempDir::new().unwrap();
    let workbook = root.path().join("workbook.json");
    std::fs::write(&workbook, WORKBOOK).unwrap();

    let motors = root.path().join("motors");
    let prices = root.path().join("informasi-tambahan");
    std::fs::create_dir_all(motors.join("NEW_BEAT_STREET")).unwrap();
    std::fs::create_dir_all(&prices).unwrap();
    std::fs::write(motors.join("NEW_BEAT_STREET").join("black.jpg"), b"img").unwrap();
    std::fs::write(motors.join("NEW_BEAT_STREET").join("white.jpg"), b"img").unwrap();
    std::fs::write(prices.join("BEAT STREET.jpeg"), b"img").unwrap();

    let assets = Arc::new(AssetLibrary::new(motors, prices));
    let catalog = Arc::new(Catalog::new(
        Arc::new(JsonWorkbook::new(workbook)),
        assets.clone(),
        &CatalogConfig::default(),
    ));
    let store = Arc::new(
        ConversationStore::open(
            RetentionPolicy::default(),
            Arc::new(InMemorySnapshotStore::new()),
        )
        .await,
    );
    let provider = Arc::new(provider);

    let assistant = Assistant::new(provider.clone(), catalog, store.clone(), assets).with_config(config);

    Fixture {
        _root: root,
        provider,
        store,
        assistant,
    }
}

const CUSTOMER: &str = "62812345@c.us";

// ── Tests ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn price_question_sends_price_list_with_caption() {
    let f = fixture(ScriptedProvider::text(&[
        "[SEND_PRICELIST:NEW_BEAT_STREET] **Beat Street** OTR *19,5jt*",
    ]))
    .await;
    let channel = RecordingChannel::default();

    let handled = f
        .assistant
        .handle_message(&channel, &InboundMessage::direct(CUSTOMER, "harga beat street berapa?"))
        .await
        .unwrap();

    assert!(matches!(handled, Handled::Replied(_)));
    assert_eq!(
        channel.sent(),
        vec![Sent::File {
            name: "BEAT STREET.jpeg".into(),
            caption: "*Beat Street* OTR *19,5jt*".into(),
        }]
    );

    let (prompt, history_len) = f.provider.calls().remove(0);
    assert_eq!(history_len, 0);
    assert!(prompt.contains("Beat Street (Kode Gambar: [FOLDER_IMG: NEW_BEAT_STREET])"));
    assert!(prompt.contains("• BEAT STREET (2025) - Warna Hitam (Black) [BK]: 4 unit"));
    assert!(!prompt.contains("[WH]"));
    assert!(prompt.contains("BARU PERTAMA KALI"));

    assert!(f.store.is_greeted(CUSTOMER).await);
    let history = f.store.history(CUSTOMER).await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "harga beat street berapa?");
    assert!(history[1].content.starts_with("[SEND_PRICELIST:"));
}

#[tokio::test]
async fn follow_up_carries_topic_and_history() {
    let f = fixture(ScriptedProvider::text(&[
        "Beat Street ready Kak",
        "DP mulai *2jt* Kak",
    ]))
    .await;
    let channel = RecordingChannel::default();

    f.assistant
        .handle_message(&channel, &InboundMessage::direct(CUSTOMER, "ada beat?"))
        .await
        .unwrap();
    f.assistant
        .handle_message(&channel, &InboundMessage::direct(CUSTOMER, "dp nya berapa?"))
        .await
        .unwrap();

    let calls = f.provider.calls();
    let (second_prompt, history_len) = &calls[1];
    assert_eq!(*history_len, 2);
    assert!(second_prompt.contains(
        "[SYSTEM CONTEXT: User sedang bertanya tentang motor BEAT. \
         Jawablah pertanyaan berikut dalam konteks motor tersebut.]\n\nUser: dp nya berapa?"
    ));
    assert!(second_prompt.contains("JANGAN pakai greeting \"Sampurasun\" lagi"));
    assert_eq!(
        channel.sent(),
        vec![
            Sent::Text("Beat Street ready Kak".into()),
            Sent::Text("DP mulai *2jt* Kak".into()),
        ]
    );
}

#[tokio::test]
async fn colour_request_sends_text_then_every_photo() {
    let f = fixture(ScriptedProvider::text(&[
        "[SEND_ALL_COLORS:BEAT_STREET] Ada 2 warna Kak",
    ]))
    .await;
    let channel = RecordingChannel::default();

    f.assistant
        .handle_message(&channel, &InboundMessage::direct(CUSTOMER, "warna beat apa aja"))
        .await
        .unwrap();

    assert_eq!(
        channel.sent(),
        vec![
            Sent::Text("Ada 2 warna Kak".into()),
            Sent::File { name: "black.jpg".into(), caption: String::new() },
            Sent::File { name: "white.jpg".into(), caption: String::new() },
        ]
    );
}

#[tokio::test]
async fn provider_failure_sends_apology_without_state_change() {
    let f = fixture(ScriptedProvider::new(vec![Err(ProviderError::RateLimited {
        retry_after_secs: 30,
    })]))
    .await;
    let channel = RecordingChannel::default();

    let handled = f
        .assistant
        .handle_message(&channel, &InboundMessage::direct(CUSTOMER, "halo"))
        .await
        .unwrap();

    assert_eq!(
        handled,
        Handled::Replied(dealerbot_assistant::reply::TECHNICAL_ISSUE_REPLY.into())
    );
    assert!(!f.store.is_greeted(CUSTOMER).await);
    assert!(f.store.history(CUSTOMER).await.is_empty());
}

#[tokio::test]
async fn empty_reply_becomes_fallback() {
    let f = fixture(ScriptedProvider::text(&["   \n "])).await;
    let reply = f.assistant.process_chat(CUSTOMER, "halo").await;
    assert_eq!(reply, dealerbot_assistant::reply::EMPTY_REPLY);
    assert!(!f.store.is_greeted(CUSTOMER).await);
}

#[tokio::test]
async fn broadcasts_and_groups_are_ignored() {
    let f = fixture(ScriptedProvider::text(&[])).await;
    let channel = RecordingChannel::default();

    for from in ["status@broadcast", "120363025@g.us"] {
        let handled = f
            .assistant
            .handle_message(&channel, &InboundMessage::direct(from, "promo?"))
            .await
            .unwrap();
        assert_eq!(handled, Handled::Ignored);
    }

    assert!(f.provider.calls().is_empty());
    assert!(channel.sent().is_empty());
}

#[tokio::test]
async fn simultaneous_first_messages_greet_once() {
    let f = fixture(
        ScriptedProvider::text(&["Sampurasun Kak, ada yang bisa dibantu?", "Beat ready Kak"])
            .with_latency(Duration::from_millis(50)),
    )
    .await;

    tokio::join!(
        f.assistant.process_chat(CUSTOMER, "halo"),
        f.assistant.process_chat(CUSTOMER, "ada beat?"),
    );

    let calls = f.provider.calls();
    assert_eq!(calls.len(), 2);
    let first_contact = calls
        .iter()
        .filter(|(prompt, _)| prompt.contains("BARU PERTAMA KALI"))
        .count();
    assert_eq!(first_contact, 1);
    assert_eq!(calls[1].1, 2, "second turn sees the first exchange");

    let roles: Vec<Role> = f
        .store
        .history(CUSTOMER)
        .await
        .into_iter()
        .map(|t| t.role)
        .collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User, Role::Assistant]);
}

#[tokio::test]
async fn app_config_sets_persona_promo_and_pacing() {
    let mut config = AppConfig::default();
    config.assistant.persona_name = "Rina".into();
    config.assistant.promo = "Gratis helm untuk pembelian bulan ini".into();
    config.assets.attachment_delay_ms = 250;

    let f = fixture_with(ScriptedProvider::text(&[]), &config).await;
    assert_eq!(f.assistant.attachment_delay(), Duration::from_millis(250));
    assert_eq!(f.assistant.config().persona_name, "Rina");

    let prompt = f.assistant.build_prompt(CUSTOMER, "ada promo?").await;
    assert!(prompt.starts_with("Kamu adalah Rina, Customer Service di NSS Honda Cibadak."));
    assert!(prompt.contains("PROMO:\nGratis helm untuk pembelian bulan ini"));
    assert!(f.provider.calls().is_empty());
}
