//! JSON workbook — a spreadsheet export on disk as a [`SheetSource`].
//!
//! Format:
//!
//! ```json
//! { "sheets": [ { "name": "BEAT", "rows": [["TIPE", "OTR"], ["Beat", 19500000]] } ] }
//! ```
//!
//! Cells may be strings, numbers, booleans or null; everything is handed to
//! the decoders as text, null as the empty string. The file is re-read on
//! every call so a re-export is picked up by the next cache refresh.

use async_trait::async_trait;
use dealerbot_core::catalog::Grid;
use dealerbot_core::error::CatalogError;
use dealerbot_core::sheet::SheetSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,

    #[serde(default)]
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl Sheet {
    /// The sheet as a grid of text cells.
    pub fn grid(&self) -> Grid {
        self.rows
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect()
    }
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Workbook {
    pub fn parse(content: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(content).map_err(|e| CatalogError::Sheet(format!("Invalid workbook JSON: {e}")))
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// A workbook file read through the [`SheetSource`] interface.
pub struct JsonWorkbook {
    path: PathBuf,
}

impl JsonWorkbook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Workbook, CatalogError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CatalogError::Sheet(format!("Failed to read workbook {}: {e}", self.path.display()))
        })?;
        let workbook = Workbook::parse(&content)?;
        debug!(path = %self.path.display(), sheets = workbook.sheets.len(), "Workbook loaded");
        Ok(workbook)
    }
}

#[async_trait]
impl SheetSource for JsonWorkbook {
    fn name(&self) -> &str {
        "json"
    }

    async fn sheet_names(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.load().await?.sheets.into_iter().map(|s| s.name).collect())
    }

    async fn read_grid(&self, sheet: &str) -> Result<Grid, CatalogError> {
        let workbook = self.load().await?;
        workbook
            .sheet(sheet)
            .map(Sheet::grid)
            .ok_or_else(|| CatalogError::SheetNotFound(sheet.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "sheets": [
            { "name": "BEAT", "rows": [["TIPE", "OTR", "DP"], ["", "", "", 11], ["Beat", 19500000, null, true]] },
            { "name": "DATA_STOK", "rows": [] }
        ]
    }"#;

    #[test]
    fn cells_become_text() {
        let workbook = Workbook::parse(SAMPLE).unwrap();
        let grid = workbook.sheet("BEAT").unwrap().grid();
        assert_eq!(grid[1][3], "11");
        assert_eq!(grid[2], vec!["Beat", "19500000", "", "true"]);
    }

    #[test]
    fn invalid_json_is_a_sheet_error() {
        assert!(matches!(Workbook::parse("{"), Err(CatalogError::Sheet(_))));
    }

    #[tokio::test]
    async fn reads_sheets_from_disk() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "{SAMPLE}").unwrap();

        let source = JsonWorkbook::new(tmp.path());
        assert_eq!(source.sheet_names().await.unwrap(), vec!["BEAT", "DATA_STOK"]);
        assert!(source.read_grid("DATA_STOK").await.unwrap().is_empty());
        assert!(matches!(
            source.read_grid("MISSING").await,
            Err(CatalogError::SheetNotFound(_))
        ));
    }

    #[tokio::test]
    async fn missing_file_is_a_sheet_error() {
        let source = JsonWorkbook::new("/nonexistent/workbook.json");
        assert!(matches!(source.sheet_names().await, Err(CatalogError::Sheet(_))));
    }
}
