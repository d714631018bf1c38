use async_trait::async_trait;

use crate::errors::Result;

/// A worksheet inside a spreadsheet document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worksheet {
    pub document_id: String,
    pub sheet_id: i64,
    pub title: String,
}

/// The remote operations the store needs. Row numbers are 1-based and
/// include the header row.
#[async_trait]
pub trait SpreadsheetClient: Send + Sync {
    /// Identity the remote side sees, used in provisioning hints.
    fn identity(&self) -> &str;

    /// Returns the id of the document with this title, if one is visible.
    async fn find_document(&self, title: &str) -> Result<Option<String>>;

    async fn create_document(&self, title: &str) -> Result<String>;

    async fn list_worksheets(&self, document_id: &str) -> Result<Vec<Worksheet>>;

    async fn add_worksheet(
        &self,
        document_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<Worksheet>;

    /// Every non-empty row of the worksheet, header first. Trailing empty
    /// cells may be omitted.
    async fn fetch_values(&self, sheet: &Worksheet) -> Result<Vec<Vec<String>>>;

    async fn append_row(&self, sheet: &Worksheet, cells: Vec<String>) -> Result<()>;

    async fn update_row(&self, sheet: &Worksheet, row_number: usize, cells: Vec<String>)
        -> Result<()>;

    async fn delete_row(&self, sheet: &Worksheet, row_number: usize) -> Result<()>;
}
