//! Catalog domain types — decoded stock and price rows, asset matches.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A flat grid of cell values as delivered by the spreadsheet transport.
///
/// Rows may be ragged: a missing trailing cell is equivalent to an empty one.
pub type Grid = Vec<Vec<String>>;

/// Read a trimmed cell, treating out-of-range columns as empty.
pub fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(|c| c.trim()).unwrap_or("")
}

/// One unit line from the stock report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub year: String,
    pub model: String,
    /// Upper-cased colour code as printed in the sheet (e.g. `WH`)
    pub color_code: String,
    /// Display name for the colour code, or the code itself when unmapped
    pub color_name: String,
    pub quantity: u32,
}

/// One priced item from a price-list sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otr: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<String>,

    /// Tenor length in months → instalment amount, ordered by tenor
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub installments: BTreeMap<u32, String>,

    /// Matching image folder, when one clears the acceptance threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_folder: Option<String>,
}

/// Human label for a tenor column (`11` → `11 bulan`).
pub fn tenor_label(months: u32) -> String {
    format!("{months} bulan")
}

/// Outcome of resolving a free-text name against known identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The accepted identifier, `None` when nothing cleared the threshold
    pub candidate: Option<String>,

    /// Best score observed, in `[0, 1]`
    pub score: f64,
}

impl MatchResult {
    pub fn none(score: f64) -> Self {
        Self {
            candidate: None,
            score,
        }
    }

    pub fn is_match(&self) -> bool {
        self.candidate.is_some()
    }
}

/// Which family of asset identifiers to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    /// Image folders, one per model, holding colour photos
    Motors,
    /// Price-list images, one file per model
    PriceLists,
}

/// Enumerates known asset identifiers.
///
/// Implementations must return identifiers in a stable order so that
/// resolution ties break the same way on every call.
pub trait CandidateSource: Send + Sync {
    fn list_candidates(&self, category: AssetCategory) -> Vec<String>;
}

/// A fixed candidate list, handy for tests and offline decoding.
impl CandidateSource for Vec<String> {
    fn list_candidates(&self, _category: AssetCategory) -> Vec<String> {
        self.clone()
    }
}
