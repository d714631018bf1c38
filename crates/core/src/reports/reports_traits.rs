use async_trait::async_trait;
use chrono::NaiveDate;

use super::reports_model::{MonthlySummary, Reminder};
use crate::errors::Result;
use crate::production::YieldTotal;
use crate::sales::BuyerBalance;

/// Read-only figures computed over the stored collections.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    /// One entry per known buyer: sales minus payments and advances.
    async fn buyer_balances(&self) -> Result<Vec<BuyerBalance>>;

    /// Yield per date, oldest first.
    async fn daily_yield_totals(&self) -> Result<Vec<YieldTotal>>;

    async fn monthly_summary(&self, year: i32, month: u32) -> Result<MonthlySummary>;

    /// Recurring expenses and animal events due on or before `today`.
    async fn due_reminders(&self, today: NaiveDate) -> Result<Vec<Reminder>>;
}
