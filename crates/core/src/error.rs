//! Error types for the dealerbot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.
//!
//! Absence of an asset match is not an error: it is the `None` side of
//! [`MatchResult`](crate::catalog::MatchResult).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Required header row or columns could not be located.
    #[error("Malformed table: {reason}")]
    MalformedTable { reason: String },

    /// The spreadsheet transport failed to deliver a sheet.
    #[error("Sheet read failed: {0}")]
    Sheet(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),
}

impl CatalogError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedTable {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Snapshot rejected: {0}")]
    Snapshot(String),
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Attachment not readable: {0}")]
    Attachment(String),
}
