//! SheetSource trait — the abstraction over the spreadsheet transport.
//!
//! Implementations: JSON workbook file (offline / tests). A hosted
//! spreadsheet API plugs in behind the same two calls.

use async_trait::async_trait;
use crate::catalog::Grid;
use crate::error::CatalogError;

#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Human-readable source name (e.g., "json", "google").
    fn name(&self) -> &str;

    /// Sheet titles in workbook order.
    async fn sheet_names(&self) -> Result<Vec<String>, CatalogError>;

    /// Every populated row of a sheet.
    async fn read_grid(&self, sheet: &str) -> Result<Grid, CatalogError>;
}
