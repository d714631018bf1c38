//! Remote spreadsheet storage for the dairy bookkeeping application.
//!
//! One spreadsheet document holds one worksheet per collection. Row 1 of each
//! worksheet is the header, every following row is one record, and every cell
//! is text. Reads go through a short-lived cache and a fetch pacer that keeps
//! the store under the remote API quota; rows are decoded leniently so that a
//! malformed row is skipped instead of failing the whole collection.
//!
//! [`SheetsStore`] implements the same [`dairy_core::FarmStore`] port as the
//! local JSON store. The remote API is reached through [`SpreadsheetClient`];
//! [`GoogleSheetsClient`] talks to Google Sheets and
//! [`testing::InMemorySpreadsheet`] keeps everything in memory.

mod auth;
mod cache;
mod client;
pub mod codec;
mod errors;
mod google;
mod pacer;
mod store;
pub mod testing;

pub use auth::{ServiceAccountAuth, ServiceAccountCredentials};
pub use cache::RecordCache;
pub use client::{SpreadsheetClient, Worksheet};
pub use errors::{Result, SheetsError};
pub use google::GoogleSheetsClient;
pub use pacer::FetchPacer;
pub use store::{ParseSummary, SheetsStore, SheetsStoreConfig};
