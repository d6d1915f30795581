//! The chat loop: one customer message in, one dispatched reply out.

use dealerbot_catalog::{AssetLibrary, Catalog};
use dealerbot_config::{AppConfig, AssistantConfig};
use dealerbot_core::channel::{Channel, InboundMessage};
use dealerbot_core::error::ChannelError;
use dealerbot_core::message::Role;
use dealerbot_core::provider::Provider;
use dealerbot_memory::ConversationStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::dispatch::{deliver, plan_reply_blocking};
use crate::prompt;
use crate::reply::{clean_markdown, DELIVERY_FAILED_REPLY, EMPTY_REPLY, TECHNICAL_ISSUE_REPLY};

/// What happened to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    /// Broadcasts and group chats are not answered
    Ignored,
    /// A reply was sent
    Replied(String),
}

pub struct Assistant {
    provider: Arc<dyn Provider>,
    catalog: Arc<Catalog>,
    conversations: Arc<ConversationStore>,
    assets: Arc<AssetLibrary>,
    config: AssistantConfig,
    attachment_delay: Duration,
    /// One turn at a time per customer
    turns: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Assistant {
    pub fn new(
        provider: Arc<dyn Provider>,
        catalog: Arc<Catalog>,
        conversations: Arc<ConversationStore>,
        assets: Arc<AssetLibrary>,
    ) -> Self {
        Self {
            provider,
            catalog,
            conversations,
            assets,
            config: AssistantConfig::default(),
            attachment_delay: Duration::from_millis(500),
            turns: Mutex::new(HashMap::new()),
        }
    }

    /// Take persona, promo and attachment pacing from the application config.
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.config = config.assistant.clone();
        self.attachment_delay = Duration::from_millis(config.assets.attachment_delay_ms);
        self
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn attachment_delay(&self) -> Duration {
        self.attachment_delay
    }

    /// The full prompt that would be sent for `message`, without calling the provider.
    pub async fn build_prompt(&self, user_id: &str, message: &str) -> String {
        prompt::build_prompt(&self.config, &self.catalog, &self.conversations, user_id, message).await
    }

    async fn turn_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.turns
            .lock()
            .await
            .entry(user_id.to_string())
            .or_default()
            .clone()
    }

    /// Produce the reply text for one customer message.
    ///
    /// Never fails: provider errors and empty replies become fixed apologies,
    /// and neither is recorded in history nor marks the customer greeted.
    ///
    /// Messages from the same customer are answered one at a time, so the
    /// greeting check and the greeting mark cannot interleave.
    pub async fn process_chat(&self, user_id: &str, message: &str) -> String {
        let lock = self.turn_lock(user_id).await;
        let _turn = lock.lock().await;

        let full_prompt = self.build_prompt(user_id, message).await;
        let history = self.conversations.history(user_id).await;

        let raw = match self.provider.generate(&full_prompt, &history).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(provider = self.provider.name(), user = %user_id, error = %e, "Reply generation failed");
                return TECHNICAL_ISSUE_REPLY.to_string();
            }
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            warn!(provider = self.provider.name(), "Provider returned an empty reply");
            return EMPTY_REPLY.to_string();
        }

        let reply = clean_markdown(trimmed);
        self.conversations.mark_greeted(user_id).await;
        self.conversations.append_turn(user_id, Role::User, message).await;
        self.conversations
            .append_turn(user_id, Role::Assistant, &reply)
            .await;

        reply
    }

    /// Answer an inbound message through `channel`.
    pub async fn handle_message(
        &self,
        channel: &dyn Channel,
        message: &InboundMessage,
    ) -> Result<Handled, ChannelError> {
        if message.is_ignored() {
            debug!(from = %message.from, "Skipping broadcast or group message");
            return Ok(Handled::Ignored);
        }

        info!(from = %message.from, chars = message.body.len(), "Message received");
        let reply = self.process_chat(&message.from, &message.body).await;
        let plan = plan_reply_blocking(reply.clone(), self.assets.clone()).await;

        if let Err(e) = deliver(channel, &message.from, &plan, self.attachment_delay).await {
            warn!(channel = channel.name(), to = %message.from, error = %e, "Reply delivery failed");
            if let Err(e) = channel.send_text(&message.from, DELIVERY_FAILED_REPLY).await {
                warn!(channel = channel.name(), error = %e, "Failure notice not delivered either");
            }
            return Err(e);
        }
        Ok(Handled::Replied(reply))
    }
}
