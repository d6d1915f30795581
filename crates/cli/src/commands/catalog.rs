//! Workbook and asset inspection: `resolve`, `stock`, `prices`, `report`.

use dealerbot_catalog::{
    decode_price_sheet_with, decode_stock_sheet, find_stock_header, AssetLibrary, Catalog,
    JsonWorkbook, MatchPolicy,
};
use dealerbot_config::AppConfig;
use dealerbot_core::catalog::{tenor_label, AssetCategory, Grid};
use dealerbot_core::sheet::SheetSource;
use std::path::PathBuf;
use std::sync::Arc;

use super::load_config;

fn assets(config: &AppConfig) -> AssetLibrary {
    AssetLibrary::from_config(&config.assets).with_policy(MatchPolicy::from(&config.catalog))
}

fn workbook(config: &AppConfig, path: Option<PathBuf>) -> JsonWorkbook {
    JsonWorkbook::new(path.unwrap_or_else(|| config.catalog.workbook.clone()))
}

/// Sheets to inspect: the named one, or every sheet in the workbook.
async fn grids(
    source: &JsonWorkbook,
    only: Option<String>,
) -> Result<Vec<(String, Grid)>, Box<dyn std::error::Error>> {
    let names = match only {
        Some(name) => vec![name],
        None => source.sheet_names().await?,
    };

    let mut grids = Vec::with_capacity(names.len());
    for name in names {
        let grid = source.read_grid(&name).await?;
        grids.push((name, grid));
    }
    Ok(grids)
}

pub fn resolve(name: &str, category: AssetCategory) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let assets = assets(&config);
    let catalog = Catalog::new(
        Arc::new(workbook(&config, None)),
        Arc::new(assets),
        &config.catalog,
    );

    let result = catalog.resolve_asset(name, category);
    match result.candidate {
        Some(candidate) => println!("✅ {name} → {candidate} (score {:.2})", result.score),
        None => println!("❌ No match for {name} (best score {:.2})", result.score),
    }
    Ok(())
}

pub async fn stock(
    path: Option<PathBuf>,
    sheet: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let source = workbook(&config, path);

    let mut found = false;
    for (name, grid) in grids(&source, sheet).await? {
        let Some(header_row) = find_stock_header(&grid) else {
            continue;
        };
        found = true;

        println!("📦 {name}");
        match decode_stock_sheet(&grid, header_row) {
            Ok(records) => {
                for r in &records {
                    println!(
                        "  {:<24} {:<6} {:<4} {:<28} {:>4}",
                        r.model, r.year, r.color_code, r.color_name, r.quantity
                    );
                }
                let total: u32 = records.iter().map(|r| r.quantity).sum();
                println!("  {} lines, {total} units", records.len());
            }
            Err(e) => println!("  ⚠️  {e}"),
        }
    }

    if !found {
        println!("No stock sheet found in {}", source.path().display());
    }
    Ok(())
}

pub async fn prices(
    path: Option<PathBuf>,
    sheet: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let source = workbook(&config, path);
    let assets = assets(&config);
    let folders = assets.motor_folders();

    for (name, grid) in grids(&source, sheet).await? {
        if find_stock_header(&grid).is_some() {
            continue;
        }
        let records = decode_price_sheet_with(&grid, &folders, assets.policy());
        if records.is_empty() {
            continue;
        }

        println!("💰 {name}");
        for r in &records {
            let folder = r.asset_folder.as_deref().unwrap_or("-");
            println!(
                "  {:<28} OTR {:<14} DP {:<14} [{folder}]",
                r.name,
                r.otr.as_deref().unwrap_or("-"),
                r.down_payment.as_deref().unwrap_or("-"),
            );
            for (months, amount) in &r.installments {
                println!("      {:<10} {amount}", tenor_label(*months));
            }
        }
    }
    Ok(())
}

pub async fn report(path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let catalog = Catalog::new(
        Arc::new(workbook(&config, path)),
        Arc::new(assets(&config)),
        &config.catalog,
    );

    let report = catalog
        .produce_report()
        .await
        .map_err(|e| format!("Failed to build report: {e}"))?;
    println!("{report}");
    Ok(())
}
