//! Dairy Core - record types, the storage port, and bookkeeping services.
//!
//! This crate is backend-agnostic. It defines the repository traits that the
//! `storage-json` and `storage-sheets` crates implement, and the services
//! that work against any of them through [`store::FarmStore`].

pub mod constants;
pub mod errors;
pub mod expenses;
pub mod livestock;
pub mod production;
pub mod reports;
pub mod sales;
pub mod store;
pub mod utils;

pub use expenses::Expense;
pub use livestock::{Animal, AnimalEvent, EventType};
pub use production::DailyYield;
pub use sales::{Buyer, EntryType, MilkSale, Payment};
pub use store::{Collection, FarmStore};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
