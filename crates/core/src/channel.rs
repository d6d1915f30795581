//! Channel trait — the abstraction over the messaging platform.
//!
//! The assistant only needs two outbound capabilities: send text, and send
//! text with one attachment. Delivery guarantees are the channel's own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::ChannelError;

/// Broadcast pseudo-sender used for status updates.
pub const STATUS_BROADCAST: &str = "status@broadcast";

/// Suffix of group chat identifiers.
pub const GROUP_SUFFIX: &str = "@g.us";

/// A message received from the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Sender identifier (platform-specific chat ID)
    pub from: String,

    /// The text content
    pub body: String,

    /// Whether the platform flagged this as a group message
    #[serde(default)]
    pub is_group: bool,
}

impl InboundMessage {
    pub fn direct(from: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            body: body.into(),
            is_group: false,
        }
    }

    /// Status broadcasts and group chats are not answered.
    pub fn is_ignored(&self) -> bool {
        self.from == STATUS_BROADCAST || self.is_group || self.from.contains(GROUP_SUFFIX)
    }
}

#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name (e.g., "whatsapp", "cli").
    fn name(&self) -> &str;

    /// Send a text message to a destination.
    async fn send_text(&self, destination: &str, text: &str) -> std::result::Result<(), ChannelError>;

    /// Send a file with an optional caption.
    async fn send_attachment(
        &self,
        destination: &str,
        caption: &str,
        attachment: &Path,
    ) -> std::result::Result<(), ChannelError>;
}
