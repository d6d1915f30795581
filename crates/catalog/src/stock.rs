//! Stock sheet decoder — pivot-table export → flat unit records.
//!
//! The dealer's stock export is a pivot table: the year and the model are
//! printed only on the first row of their group, subtotal rows ("2025 Total")
//! are interleaved, and colours are short codes. Decoding is a fold over the
//! rows below the header that carries the last seen year and model forward.

use dealerbot_core::catalog::{cell, StockRecord};
use dealerbot_core::error::CatalogError;
use tracing::debug;

use crate::colors::color_name;

const YEAR_HEADER: &str = "TAHUN";
const MODEL_HEADER: &str = "KODE KE 2";
const COLOR_HEADER: &str = "WARNA";
const QUANTITY_HEADER: &str = "TOTAL";

fn contains_total(value: &str) -> bool {
    value.to_lowercase().contains("total")
}

/// Index of the first row that carries the model-code header.
///
/// Sheets with such a row are stock sheets; others are tried as price lists.
pub fn find_stock_header(grid: &[Vec<String>]) -> Option<usize> {
    grid.iter().position(|row| {
        row.iter()
            .any(|c| c.to_uppercase().contains(MODEL_HEADER))
    })
}

/// Column positions of the four group keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockColumns {
    pub year: usize,
    pub model: usize,
    pub color: usize,
    pub quantity: usize,
}

impl StockColumns {
    /// Locate the columns by case-insensitive substring search over the header.
    pub fn locate(header: &[String]) -> Result<Self, CatalogError> {
        let find = |key: &str| {
            header
                .iter()
                .position(|c| c.to_uppercase().contains(key))
                .ok_or_else(|| CatalogError::malformed(format!("column {key} not found in header")))
        };

        Ok(Self {
            year: find(YEAR_HEADER)?,
            model: find(MODEL_HEADER)?,
            color: find(COLOR_HEADER)?,
            quantity: find(QUANTITY_HEADER)?,
        })
    }
}

/// Carry-forward state of the fold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockCursor {
    pub year: String,
    pub model: String,
}

impl StockCursor {
    /// Consume one data row, emitting at most one record.
    pub fn step(&mut self, row: &[String], cols: &StockColumns) -> Option<StockRecord> {
        let year = cell(row, cols.year);
        let model = cell(row, cols.model);

        if !year.is_empty() && !contains_total(year) {
            self.year = year.to_string();
        }

        // Subtotal and grand-total rows
        if contains_total(year) || contains_total(model) {
            return None;
        }

        if !model.is_empty() {
            self.model = model.to_string();
        }

        let color = cell(row, cols.color);
        let quantity = cell(row, cols.quantity);
        if self.model.is_empty() || color.is_empty() || quantity.is_empty() || quantity == "0" {
            return None;
        }

        let Some(quantity) = parse_quantity(quantity) else {
            debug!(model = %self.model, value = %quantity, "Skipping stock row with non-numeric total");
            return None;
        };
        if quantity == 0 {
            return None;
        }

        let color_code = color.to_uppercase();
        let color_name = color_name(&color_code)
            .map(str::to_string)
            .unwrap_or_else(|| color.to_string());

        Some(StockRecord {
            year: self.year.clone(),
            model: self.model.clone(),
            color_code,
            color_name,
            quantity,
        })
    }
}

/// Unit counts, tolerating thousands separators and whole-number floats.
fn parse_quantity(value: &str) -> Option<u32> {
    let plain = value.replace(',', "");
    if let Ok(n) = plain.parse::<u32>() {
        return Some(n);
    }
    let f = plain.parse::<f64>().ok()?;
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64).then_some(f as u32)
}

/// Decode every unit row below `header_row`.
///
/// Fails with `MalformedTable` when the header row is missing or lacks one of
/// the four key columns; callers substitute a placeholder report.
pub fn decode_stock_sheet(
    grid: &[Vec<String>],
    header_row: usize,
) -> Result<Vec<StockRecord>, CatalogError> {
    let header = grid
        .get(header_row)
        .ok_or_else(|| CatalogError::malformed(format!("header row {header_row} out of range")))?;
    let cols = StockColumns::locate(header)?;

    let mut cursor = StockCursor::default();
    let records: Vec<StockRecord> = grid[header_row + 1..]
        .iter()
        .filter_map(|row| cursor.step(row, &cols))
        .collect();

    debug!(records = records.len(), "Stock sheet decoded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn header() -> &'static [&'static str] {
        &["TAHUN", "KODE KE 2", "WARNA", "TOTAL"]
    }

    #[test]
    fn decodes_reference_example() {
        let rows = grid(&[
            header(),
            &["2025", "BEAT STREET", "BW", "12"],
            &["", "", "WH", "20"],
            &["2025 Total", "", "", ""],
        ]);

        let records = decode_stock_sheet(&rows, 0).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.model == "BEAT STREET" && r.year == "2025"));
        assert_eq!(records[0].color_code, "BW");
        assert_eq!(records[0].color_name, "Brown (Coklat)");
        assert_eq!(records[0].quantity, 12);
        assert_eq!(records[1].color_code, "WH");
        assert_eq!(records[1].color_name, "Putih (White)");
        assert_eq!(records[1].quantity, 20);
    }

    #[test]
    fn model_carries_forward_across_blank_cells() {
        let rows = grid(&[
            header(),
            &["2024", "VARIO 160", "BK", "3"],
            &["", "", "RD", "1"],
            &["", "", "", ""],
            &["", "", "SV", "2"],
            &["", "SCOOPY", "CR", "4"],
            &["", "", "MH", "5"],
        ]);

        let records = decode_stock_sheet(&rows, 0).unwrap();
        let models: Vec<&str> = records.iter().map(|r| r.model.as_str()).collect();
        assert_eq!(
            models,
            vec!["VARIO 160", "VARIO 160", "VARIO 160", "SCOOPY", "SCOOPY"]
        );
        assert!(records.iter().all(|r| r.year == "2024"));
    }

    #[test]
    fn subtotal_rows_are_skipped_but_year_advances() {
        let rows = grid(&[
            header(),
            &["2024", "PCX 160", "WH", "2"],
            &["", "PCX 160 Total", "", "2"],
            &["2024 Total", "", "", "2"],
            &["2025", "PCX 160", "BK", "6"],
            &["Grand Total", "", "", "8"],
        ]);

        let records = decode_stock_sheet(&rows, 0).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].year, "2024");
        assert_eq!(records[1].year, "2025");
        assert_eq!(records[1].model, "PCX 160");
    }

    #[test]
    fn zero_and_missing_quantities_are_dropped() {
        let rows = grid(&[
            header(),
            &["2025", "GENIO", "WH", "0"],
            &["", "", "BK", ""],
            &["", "", "RD", "00"],
            &["", "", "", "7"],
            &["", "", "BL", "n/a"],
            &["", "", "GY", "1"],
        ]);

        let records = decode_stock_sheet(&rows, 0).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].color_name, "Abu-abu (Grey)");
    }

    #[test]
    fn rows_before_any_model_emit_nothing() {
        let rows = grid(&[header(), &["2025", "", "WH", "4"]]);
        assert!(decode_stock_sheet(&rows, 0).unwrap().is_empty());
    }

    #[test]
    fn unmapped_color_passes_through() {
        let rows = grid(&[header(), &["2025", "CRF", " xq ", "1"]]);
        let records = decode_stock_sheet(&rows, 0).unwrap();
        assert_eq!(records[0].color_code, "XQ");
        assert_eq!(records[0].color_name, "xq");
    }

    #[test]
    fn header_found_below_title_rows() {
        let rows = grid(&[
            &["Laporan Stok"],
            &[],
            &["Tahun Rakit", "Kode Ke 2", "Deskripsi", "Warna", "Grand Total"],
            &["2025", "ADV 160", "ADV", "MB", "1,200"],
        ]);

        let header_row = find_stock_header(&rows).unwrap();
        assert_eq!(header_row, 2);
        let records = decode_stock_sheet(&rows, header_row).unwrap();
        assert_eq!(records[0].quantity, 1200);
        assert_eq!(records[0].color_name, "Matte Biru");
    }

    #[test]
    fn missing_column_is_malformed() {
        let rows = grid(&[&["TAHUN", "KODE KE 2", "TOTAL"], &["2025", "BEAT", "1"]]);
        let err = decode_stock_sheet(&rows, 0).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedTable { .. }));
        assert!(err.to_string().contains("WARNA"));
    }

    #[test]
    fn header_out_of_range_is_malformed() {
        let rows = grid(&[header()]);
        assert!(decode_stock_sheet(&rows, 3).is_err());
        assert!(find_stock_header(&grid(&[&["TIPE", "OTR"]])).is_none());
    }

    #[test]
    fn ragged_rows_are_tolerated() {
        let rows = grid(&[header(), &["2025", "BEAT"], &["", "", "WH", "2"]]);
        let records = decode_stock_sheet(&rows, 0).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].model, "BEAT");
    }
}
