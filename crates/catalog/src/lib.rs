//! Catalog engine for dealerbot.
//!
//! Turns the dealer's spreadsheet into the text block the assistant answers
//! from, and maps free-text model names onto the image folders and price-list
//! files on disk.
//!
//! - [`similarity`] / [`resolver`]: bigram scoring and threshold matching
//! - [`stock`] / [`price`]: carry-forward decoders for the two sheet layouts
//! - [`report`]: every sheet decoded and rendered
//! - [`cache`] / [`service`]: the time-boxed report behind one handle
//! - [`assets`] / [`workbook`]: filesystem-backed collaborators

pub mod assets;
pub mod cache;
pub mod colors;
pub mod price;
pub mod report;
pub mod resolver;
pub mod service;
pub mod similarity;
pub mod stock;
pub mod workbook;

pub use assets::AssetLibrary;
pub use cache::{CacheEntry, DataCache};
pub use price::{decode_price_sheet, decode_price_sheet_with};
pub use report::{build_report, collect_report, CatalogReport, FALLBACK_REPORT};
pub use resolver::{resolve, resolve_asset, MatchPolicy};
pub use service::Catalog;
pub use stock::{decode_stock_sheet, find_stock_header};
pub use workbook::JsonWorkbook;
