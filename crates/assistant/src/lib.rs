//! Chat orchestration for dealerbot.
//!
//! Ties the catalog, the conversation store, an LLM [`Provider`] and a
//! messaging [`Channel`] together: inject the remembered topic, assemble the
//! prompt, clean the reply, and send it with any requested attachments.
//!
//! [`Provider`]: dealerbot_core::Provider
//! [`Channel`]: dealerbot_core::Channel

pub mod assistant;
pub mod dispatch;
pub mod prompt;
pub mod reply;

pub use assistant::{Assistant, Handled};
pub use dispatch::{deliver, plan_reply, plan_reply_blocking, OutboundPlan};
pub use prompt::contextualize;
pub use reply::{clean_markdown, extract_marker, Marker};
