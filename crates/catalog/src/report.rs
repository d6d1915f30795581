//! Catalog report — every sheet of the workbook, decoded and rendered as
//! the text block the assistant's prompt is built around.

use dealerbot_core::catalog::{tenor_label, PriceRecord, StockRecord};
use dealerbot_core::error::CatalogError;
use dealerbot_core::sheet::SheetSource;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use tracing::{info, warn};

use crate::price::{decode_price_sheet_with, tenor_columns};
use crate::resolver::MatchPolicy;
use crate::stock::{decode_stock_sheet, find_stock_header};

/// Sent instead of a report when no price row could be decoded.
pub const FALLBACK_REPORT: &str = "Data motor tersedia, silakan hubungi untuk info lengkap.";

/// A header, a tenor row and at least one data row.
const MIN_SHEET_ROWS: usize = 3;

/// One decoded sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Prices {
        sheet: String,
        records: Vec<PriceRecord>,
    },
    Stock {
        sheet: String,
        records: Result<Vec<StockRecord>, CatalogError>,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogReport {
    pub sections: Vec<Section>,
    /// Union of tenors declared by the price sheets, ascending
    pub tenors: Vec<u32>,
}

impl CatalogReport {
    pub fn price_count(&self) -> usize {
        self.sections
            .iter()
            .map(|s| match s {
                Section::Prices { records, .. } => records.len(),
                Section::Stock { .. } => 0,
            })
            .sum()
    }

    /// Render the report, advertising `fallback_tenors` when no sheet declares any.
    pub fn render(&self, fallback_tenors: &[u32]) -> String {
        if self.price_count() == 0 {
            return FALLBACK_REPORT.to_string();
        }

        let tenors = if self.tenors.is_empty() {
            fallback_tenors
        } else {
            &self.tenors
        };
        let tenor_list: Vec<String> = tenors.iter().map(|m| tenor_label(*m)).collect();

        let mut out = String::from("DAFTAR MOTOR HONDA:\n\n");
        let _ = writeln!(out, "TENOR TERSEDIA: {}", tenor_list.join(", "));
        out.push_str("CATATAN: Setiap motor menampilkan cicilan untuk semua tenor yang tersedia\n\n");

        let mut number = 0;
        for section in &self.sections {
            match section {
                Section::Prices { sheet, records } => {
                    let _ = writeln!(out, "=== {sheet} ===");
                    for record in records {
                        number += 1;
                        let _ = writeln!(out, "{number}. {}", price_line(record));
                    }
                    out.push('\n');
                }
                Section::Stock { records, .. } => {
                    out.push_str(&stock_block(records));
                    out.push('\n');
                }
            }
        }

        out
    }
}

fn price_line(record: &PriceRecord) -> String {
    let mut line = record.name.clone();
    if let Some(folder) = &record.asset_folder {
        let _ = write!(line, " (Kode Gambar: [FOLDER_IMG: {folder}])");
    }
    if let Some(otr) = &record.otr {
        let _ = write!(line, " | OTR: {otr}");
    }
    if let Some(dp) = &record.down_payment {
        let _ = write!(line, " | DP: {dp}");
    }
    for (months, amount) in &record.installments {
        let _ = write!(line, " | Cicilan {}: {amount}", tenor_label(*months));
    }
    line
}

fn stock_block(records: &Result<Vec<StockRecord>, CatalogError>) -> String {
    let mut out = String::from("\n=== INFO STOK UNIT ===\n");
    match records {
        Err(_) => out.push_str("(Gagal membaca format tabel stok)\n"),
        Ok(records) if records.is_empty() => out.push_str("Belum ada data stok tersedia.\n"),
        Ok(records) => {
            for r in records {
                let _ = writeln!(
                    out,
                    "• {} ({}) - Warna {} [{}]: {} unit",
                    r.model, r.year, r.color_name, r.color_code, r.quantity
                );
            }
        }
    }
    out
}

/// Read and decode every sheet of `source`.
///
/// A transport failure on any sheet fails the whole report, so a cache never
/// stores a report with sheets silently missing. A malformed stock sheet is
/// not a failure: it renders as a placeholder line.
pub async fn collect_report<S: AsRef<str>>(
    source: &dyn SheetSource,
    candidates: &[S],
    policy: &MatchPolicy,
) -> Result<CatalogReport, CatalogError> {
    let mut report = CatalogReport::default();
    let mut tenors = BTreeSet::new();

    for sheet in source.sheet_names().await? {
        let grid = source.read_grid(&sheet).await?;
        let stock_header = find_stock_header(&grid);

        let declared = tenor_columns(&grid);
        if stock_header.is_none() {
            tenors.extend(declared.iter().map(|t| t.months));
        }

        if grid.len() < MIN_SHEET_ROWS {
            info!(sheet = %sheet, rows = grid.len(), "Skipping sheet with too few rows");
            continue;
        }

        if let Some(header_row) = stock_header {
            info!(sheet = %sheet, "Detected stock data");
            let records = decode_stock_sheet(&grid, header_row);
            if let Err(e) = &records {
                warn!(sheet = %sheet, error = %e, "Stock sheet could not be decoded");
            }
            report.sections.push(Section::Stock { sheet, records });
            continue;
        }

        if declared.is_empty() {
            warn!(sheet = %sheet, "Skipping sheet (not a standard price list)");
            continue;
        }

        let records = decode_price_sheet_with(&grid, candidates, policy);
        info!(sheet = %sheet, rows = grid.len() - 2, items = records.len(), "Price sheet decoded");
        report.sections.push(Section::Prices { sheet, records });
    }

    report.tenors = tenors.into_iter().collect();
    info!(items = report.price_count(), "Catalog report collected");
    Ok(report)
}

/// Collect and render in one step.
pub async fn build_report<S: AsRef<str>>(
    source: &dyn SheetSource,
    candidates: &[S],
    policy: &MatchPolicy,
    fallback_tenors: &[u32],
) -> Result<String, CatalogError> {
    Ok(collect_report(source, candidates, policy)
        .await?
        .render(fallback_tenors))
}
