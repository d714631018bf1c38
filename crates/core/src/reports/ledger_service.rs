use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;

use super::reports_model::{MonthlySummary, Reminder, ReminderKind};
use super::reports_traits::LedgerServiceTrait;
use crate::errors::{Result, ValidationError};
use crate::expenses::ExpenseRepositoryTrait;
use crate::livestock::AnimalEventRepositoryTrait;
use crate::production::{DailyYieldRepositoryTrait, YieldTotal};
use crate::sales::{
    BuyerBalance, BuyerRepositoryTrait, MilkSaleRepositoryTrait, PaymentRepositoryTrait,
};
use crate::store::FarmStore;
use crate::utils::time_utils::is_in_month;

pub struct LedgerService {
    store: Arc<dyn FarmStore>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn FarmStore>) -> Self {
        LedgerService { store }
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    async fn buyer_balances(&self) -> Result<Vec<BuyerBalance>> {
        let buyers = self.store.get_buyers().await?;
        let sales = self.store.get_milk_sales().await?;
        let payments = self.store.get_payments().await?;

        Ok(buyers
            .into_iter()
            .map(|buyer| {
                let total_sales: f64 = sales
                    .iter()
                    .filter(|s| s.buyer_name == buyer.name)
                    .map(|s| s.total_amount)
                    .sum();
                // Advances are money already received, same as payments
                let total_paid: f64 = payments
                    .iter()
                    .filter(|p| p.buyer_name == buyer.name)
                    .map(|p| p.amount)
                    .sum();
                BuyerBalance {
                    buyer_name: buyer.name,
                    total_sales,
                    total_paid,
                    balance: total_sales - total_paid,
                }
            })
            .collect())
    }

    async fn daily_yield_totals(&self) -> Result<Vec<YieldTotal>> {
        let mut totals: BTreeMap<NaiveDate, YieldTotal> = BTreeMap::new();
        for record in self.store.get_daily_yields().await? {
            let entry = totals.entry(record.date).or_insert_with(|| YieldTotal {
                date: record.date,
                quantity: 0.0,
                records: 0,
            });
            entry.quantity += record.quantity;
            entry.records += 1;
        }
        Ok(totals.into_values().collect())
    }

    async fn monthly_summary(&self, year: i32, month: u32) -> Result<MonthlySummary> {
        if !(1..=12).contains(&month) {
            return Err(
                ValidationError::InvalidInput(format!("month {} is out of range", month)).into(),
            );
        }

        let operating_expenses: f64 = self
            .store
            .get_expenses()
            .await?
            .iter()
            .filter(|e| is_in_month(e.date, year, month))
            .map(|e| e.amount)
            .sum();
        let milk_produced: f64 = self
            .store
            .get_daily_yields()
            .await?
            .iter()
            .filter(|y| is_in_month(y.date, year, month))
            .map(|y| y.quantity)
            .sum();

        let sales = self.store.get_milk_sales().await?;
        let month_sales = sales.iter().filter(|s| is_in_month(s.date, year, month));
        let (milk_sold, revenue) = month_sales.fold((0.0, 0.0), |(qty, total), s| {
            (qty + s.quantity, total + s.total_amount)
        });

        debug!(
            "Summary {}-{:02}: expenses {}, produced {}, sold {}",
            year, month, operating_expenses, milk_produced, milk_sold
        );

        Ok(MonthlySummary {
            year,
            month,
            operating_expenses,
            milk_produced,
            milk_sold,
            revenue,
            net: revenue - operating_expenses,
        })
    }

    async fn due_reminders(&self, today: NaiveDate) -> Result<Vec<Reminder>> {
        let mut reminders = Vec::new();

        for expense in self.store.get_expenses().await? {
            if let (true, Some(due)) = (expense.is_due(today), expense.next_due_date) {
                reminders.push(Reminder {
                    kind: ReminderKind::RecurringExpense,
                    message: format!("Expense '{}' due on {}", expense.name, due),
                    record_id: expense.id,
                    due_date: due,
                });
            }
        }

        for event in self.store.get_animal_events().await? {
            if let (true, Some(due)) = (event.is_due(today), event.next_due_date) {
                reminders.push(Reminder {
                    kind: ReminderKind::AnimalEvent,
                    message: format!(
                        "Animal {}: {} due on {}",
                        event.animal_id, event.event_type, due
                    ),
                    record_id: event.id,
                    due_date: due,
                });
            }
        }

        reminders.sort_by_key(|r| r.due_date);
        Ok(reminders)
    }
}
