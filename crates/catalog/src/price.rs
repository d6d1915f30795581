//! Price sheet decoder — two-row header price list → priced items.
//!
//! Layout: row 0 holds field labels (type, OTR, DP, ...), row 1 holds the
//! tenor sub-headers. Tenor columns start at column D and are the cells of
//! row 1 that are plain month counts. Rows without a name belong to the
//! previous named item (another down-payment option for the same model).

use dealerbot_core::catalog::{cell, PriceRecord};
use std::collections::BTreeMap;
use tracing::debug;

use crate::resolver::MatchPolicy;

/// First column that may hold a tenor.
pub const FIRST_TENOR_COLUMN: usize = 3;

/// Appended to the inherited name of an unnamed row.
pub const VARIANT_MARKER: &str = " (variant)";

/// A recognized tenor column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenorColumn {
    pub index: usize,
    pub months: u32,
}

/// Tenor columns declared by the sub-header row, in column order.
pub fn tenor_columns(grid: &[Vec<String>]) -> Vec<TenorColumn> {
    let Some(sub_header) = grid.get(1) else {
        return Vec::new();
    };

    sub_header
        .iter()
        .enumerate()
        .skip(FIRST_TENOR_COLUMN)
        .filter_map(|(index, value)| {
            let value = value.trim();
            if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            value.parse().ok().map(|months| TenorColumn { index, months })
        })
        .collect()
}

/// Carry-forward state of the fold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceCursor {
    pub last_name: String,
}

impl PriceCursor {
    /// Consume one data row, emitting at most one record.
    pub fn step<S: AsRef<str>>(
        &mut self,
        row: &[String],
        tenors: &[TenorColumn],
        candidates: &[S],
        policy: &MatchPolicy,
    ) -> Option<PriceRecord> {
        let name = cell(row, 0);
        let otr = cell(row, 1);
        let down_payment = cell(row, 2);

        let has_content = !name.is_empty()
            || !otr.is_empty()
            || !down_payment.is_empty()
            || tenors.iter().any(|t| !cell(row, t.index).is_empty());
        if !has_content {
            return None;
        }

        let (display_name, base_name) = if !name.is_empty() {
            self.last_name = name.to_string();
            (name.to_string(), name)
        } else if self.last_name.is_empty() {
            return None;
        } else {
            (format!("{}{VARIANT_MARKER}", self.last_name), self.last_name.as_str())
        };

        if otr.is_empty() && down_payment.is_empty() {
            return None;
        }

        let installments: BTreeMap<u32, String> = tenors
            .iter()
            .filter_map(|t| {
                let amount = cell(row, t.index);
                (!amount.is_empty() && amount != "-").then(|| (t.months, amount.to_string()))
            })
            .collect();

        let asset_folder = policy.resolve(base_name, candidates).candidate;

        Some(PriceRecord {
            name: display_name,
            otr: (!otr.is_empty()).then(|| otr.to_string()),
            down_payment: (!down_payment.is_empty()).then(|| down_payment.to_string()),
            installments,
            asset_folder,
        })
    }
}

/// Decode a price sheet with the default matching policy.
///
/// A sheet without tenor columns is not a price list and yields nothing.
pub fn decode_price_sheet<S: AsRef<str>>(grid: &[Vec<String>], candidates: &[S]) -> Vec<PriceRecord> {
    decode_price_sheet_with(grid, candidates, &MatchPolicy::default())
}

/// Decode a price sheet with an explicit matching policy.
pub fn decode_price_sheet_with<S: AsRef<str>>(
    grid: &[Vec<String>],
    candidates: &[S],
    policy: &MatchPolicy,
) -> Vec<PriceRecord> {
    let tenors = tenor_columns(grid);
    if tenors.is_empty() {
        debug!("No tenor columns; not a price list");
        return Vec::new();
    }

    let mut cursor = PriceCursor::default();
    grid.iter()
        .skip(2)
        .filter_map(|row| cursor.step(row, &tenors, candidates, policy))
        .collect()
}
