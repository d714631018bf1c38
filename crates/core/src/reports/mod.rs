//! Ledger and dashboard figures derived from the stored collections.

mod ledger_service;
mod reports_model;
mod reports_traits;

#[cfg(test)]
mod ledger_service_tests;

pub use ledger_service::LedgerService;
pub use reports_model::{MonthlySummary, Reminder, ReminderKind};
pub use reports_traits::LedgerServiceTrait;
