//! Provider trait — the abstraction over the LLM backend.
//!
//! A Provider turns a fully assembled prompt plus the customer's recent
//! history into a reply. Retry and backoff policy live inside the
//! implementation.

use async_trait::async_trait;
use crate::error::ProviderError;
use crate::message::ConversationTurn;

#[async_trait]
pub trait Provider: Send + Sync {
    /// The provider name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Generate a reply for `prompt` given prior turns (oldest first).
    async fn generate(
        &self,
        prompt: &str,
        history: &[ConversationTurn],
    ) -> std::result::Result<String, ProviderError>;
}
