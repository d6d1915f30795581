//! # dealerbot core
//!
//! Domain types, capability traits, and error definitions for the dealerbot
//! sales assistant. This crate has **no framework dependencies**: it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (spreadsheet, LLM, messaging platform,
//! durable storage, asset directory) is a trait here. Implementations live
//! in their respective crates, so the matching, decoding and state logic can
//! be tested against in-memory stand-ins.

pub mod error;
pub mod message;
pub mod catalog;
pub mod sheet;
pub mod memory;
pub mod provider;
pub mod channel;

// Re-export key types at crate root for ergonomics
pub use error::{CatalogError, ChannelError, MemoryError, ProviderError};
pub use message::{ConversationTurn, Role};
pub use catalog::{AssetCategory, CandidateSource, Grid, MatchResult, PriceRecord, StockRecord};
pub use sheet::SheetSource;
pub use memory::{SnapshotKind, SnapshotStore};
pub use provider::Provider;
pub use channel::{Channel, InboundMessage};
