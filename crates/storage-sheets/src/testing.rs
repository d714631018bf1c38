//! In-memory spreadsheet for tests and offline runs.
//!
//! Behaves like the remote document the store expects: worksheets are lists
//! of text rows, row numbers are 1-based. It counts fetches so cache
//! behavior can be asserted, and can be told to fail reads or document
//! creation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::client::{SpreadsheetClient, Worksheet};
use crate::errors::{Result, SheetsError};

#[derive(Debug, Default)]
struct Document {
    title: String,
    sheets: Vec<(Worksheet, Vec<Vec<String>>)>,
}

#[derive(Debug, Default)]
struct State {
    documents: HashMap<String, Document>,
    next_id: i64,
}

#[derive(Debug)]
pub struct InMemorySpreadsheet {
    identity: String,
    state: Mutex<State>,
    fetches: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    deny_create: AtomicBool,
}

impl Default for InMemorySpreadsheet {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySpreadsheet {
    pub fn new() -> Self {
        Self {
            identity: "farm-bot@example.iam.gserviceaccount.com".to_string(),
            state: Mutex::new(State::default()),
            fetches: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            deny_create: AtomicBool::new(false),
        }
    }

    /// Refuses document creation, as the API does when the account may not
    /// create files.
    pub fn denying_create(self) -> Self {
        self.deny_create.store(true, Ordering::SeqCst);
        self
    }

    /// Makes every subsequent fetch fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent append, update and delete fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `fetch_values` calls so far, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Creates a document with worksheets already filled in, as if shared by
    /// the farm owner.
    pub fn seed_document(&self, title: &str, sheets: &[(&str, Vec<Vec<String>>)]) -> String {
        let mut state = self.lock();
        let document_id = format!("doc-{}", state.next_id);
        state.next_id += 1;
        let mut document = Document {
            title: title.to_string(),
            sheets: Vec::new(),
        };
        for (sheet_title, rows) in sheets {
            let sheet = Worksheet {
                document_id: document_id.clone(),
                sheet_id: state.next_id,
                title: sheet_title.to_string(),
            };
            state.next_id += 1;
            document.sheets.push((sheet, rows.clone()));
        }
        state.documents.insert(document_id.clone(), document);
        document_id
    }

    /// Current rows of a worksheet, header included.
    pub fn rows(&self, document_id: &str, title: &str) -> Vec<Vec<String>> {
        let state = self.lock();
        state
            .documents
            .get(document_id)
            .and_then(|doc| doc.sheets.iter().find(|(s, _)| s.title == title))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default()
    }

    /// Overwrites a worksheet's rows, header included.
    pub fn set_rows(&self, document_id: &str, title: &str, rows: Vec<Vec<String>>) {
        let mut state = self.lock();
        if let Some((_, existing)) = state
            .documents
            .get_mut(document_id)
            .and_then(|doc| doc.sheets.iter_mut().find(|(s, _)| s.title == title))
        {
            *existing = rows;
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SheetsError::api(503, "write rejected"));
        }
        Ok(())
    }

    fn with_sheet<T>(
        &self,
        sheet: &Worksheet,
        op: impl FnOnce(&mut Vec<Vec<String>>) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.lock();
        let rows = state
            .documents
            .get_mut(&sheet.document_id)
            .and_then(|doc| {
                doc.sheets
                    .iter_mut()
                    .find(|(s, _)| s.sheet_id == sheet.sheet_id)
            })
            .map(|(_, rows)| rows)
            .ok_or_else(|| SheetsError::not_found(format!("worksheet '{}'", sheet.title)))?;
        op(rows)
    }
}

#[async_trait]
impl SpreadsheetClient for InMemorySpreadsheet {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn find_document(&self, title: &str) -> Result<Option<String>> {
        let state = self.lock();
        let mut ids: Vec<&String> = state
            .documents
            .iter()
            .filter(|(_, doc)| doc.title == title)
            .map(|(id, _)| id)
            .collect();
        ids.sort();
        Ok(ids.first().map(|id| id.to_string()))
    }

    async fn create_document(&self, title: &str) -> Result<String> {
        if self.deny_create.load(Ordering::SeqCst) {
            return Err(SheetsError::api(
                403,
                "PERMISSION_DENIED: The caller does not have permission",
            ));
        }
        Ok(self.seed_document(title, &[]))
    }

    async fn list_worksheets(&self, document_id: &str) -> Result<Vec<Worksheet>> {
        let state = self.lock();
        let document = state
            .documents
            .get(document_id)
            .ok_or_else(|| SheetsError::not_found(format!("document '{}'", document_id)))?;
        Ok(document.sheets.iter().map(|(s, _)| s.clone()).collect())
    }

    async fn add_worksheet(
        &self,
        document_id: &str,
        title: &str,
        _rows: u32,
        _cols: u32,
    ) -> Result<Worksheet> {
        let mut state = self.lock();
        let sheet_id = state.next_id;
        state.next_id += 1;
        let document = state
            .documents
            .get_mut(document_id)
            .ok_or_else(|| SheetsError::not_found(format!("document '{}'", document_id)))?;
        let sheet = Worksheet {
            document_id: document_id.to_string(),
            sheet_id,
            title: title.to_string(),
        };
        document.sheets.push((sheet.clone(), Vec::new()));
        Ok(sheet)
    }

    async fn fetch_values(&self, sheet: &Worksheet) -> Result<Vec<Vec<String>>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(SheetsError::api(429, "RESOURCE_EXHAUSTED: read quota exceeded"));
        }
        self.with_sheet(sheet, |rows| Ok(rows.clone()))
    }

    async fn append_row(&self, sheet: &Worksheet, cells: Vec<String>) -> Result<()> {
        self.check_writes()?;
        self.with_sheet(sheet, |rows| {
            rows.push(cells);
            Ok(())
        })
    }

    async fn update_row(
        &self,
        sheet: &Worksheet,
        row_number: usize,
        cells: Vec<String>,
    ) -> Result<()> {
        self.check_writes()?;
        self.with_sheet(sheet, |rows| {
            let row = row_number
                .checked_sub(1)
                .and_then(|i| rows.get_mut(i))
                .ok_or_else(|| SheetsError::not_found(format!("row {}", row_number)))?;
            *row = cells;
            Ok(())
        })
    }

    async fn delete_row(&self, sheet: &Worksheet, row_number: usize) -> Result<()> {
        self.check_writes()?;
        self.with_sheet(sheet, |rows| {
            let index = row_number
                .checked_sub(1)
                .filter(|i| *i < rows.len())
                .ok_or_else(|| SheetsError::not_found(format!("row {}", row_number)))?;
            rows.remove(index);
            Ok(())
        })
    }
}
