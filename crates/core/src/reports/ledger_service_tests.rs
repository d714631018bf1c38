//! Unit tests for the ledger service.

use super::*;
use crate::expenses::Expense;
use crate::livestock::{AnimalEvent, EventType};
use crate::production::DailyYield;
use crate::sales::{Buyer, EntryType, MilkSale, Payment};
use crate::store::test_store::MockFarmStore;
use chrono::NaiveDate;
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn yield_record(id: &str, on: NaiveDate, quantity: f64) -> DailyYield {
    DailyYield {
        id: id.to_string(),
        date: on,
        quantity,
        notes: String::new(),
    }
}

fn payment(id: &str, buyer: &str, entry_type: EntryType, amount: f64) -> Payment {
    Payment {
        id: id.to_string(),
        date: date(2023, 10, 31),
        buyer_name: buyer.to_string(),
        entry_type,
        amount,
        notes: String::new(),
    }
}

#[tokio::test]
async fn test_buyer_balances_subtract_payments_and_advances() {
    let store = MockFarmStore::new();
    *store.buyers.lock().unwrap() = vec![Buyer::new("Ramesh", 55.0), Buyer::new("Suresh", 50.0)];
    *store.milk_sales.lock().unwrap() = vec![
        MilkSale::priced("s1", date(2023, 10, 1), "Ramesh", 10.0, 55.0),
        MilkSale::priced("s2", date(2023, 10, 2), "Ramesh", 10.0, 55.0),
        MilkSale::priced("s3", date(2023, 10, 2), "Suresh", 4.0, 50.0),
    ];
    *store.payments.lock().unwrap() = vec![
        payment("p1", "Ramesh", EntryType::Payment, 500.0),
        payment("p2", "Ramesh", EntryType::Advance, 100.0),
    ];

    let service = LedgerService::new(Arc::new(store));
    let balances = service.buyer_balances().await.unwrap();

    assert_eq!(balances.len(), 2);
    assert_eq!(balances[0].buyer_name, "Ramesh");
    assert_eq!(balances[0].total_sales, 1100.0);
    assert_eq!(balances[0].total_paid, 600.0);
    assert_eq!(balances[0].balance, 500.0);
    assert_eq!(balances[1].balance, 200.0);
}

#[tokio::test]
async fn test_daily_yield_totals_sum_records_of_same_date() {
    let store = MockFarmStore::new();
    *store.daily_yields.lock().unwrap() = vec![
        yield_record("y1", date(2023, 10, 30), 50.5),
        yield_record("y2", date(2023, 10, 29), 20.0),
        yield_record("y3", date(2023, 10, 30), 40.0),
    ];

    let service = LedgerService::new(Arc::new(store));
    let totals = service.daily_yield_totals().await.unwrap();

    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].date, date(2023, 10, 29));
    assert_eq!(totals[1].date, date(2023, 10, 30));
    assert_eq!(totals[1].quantity, 90.5);
    assert_eq!(totals[1].records, 2);
}

#[tokio::test]
async fn test_monthly_summary_only_counts_the_month() {
    let store = MockFarmStore::new();
    *store.expenses.lock().unwrap() = vec![
        Expense::new("e1", date(2023, 10, 27), "Feed", "", 500.0),
        Expense::new("e2", date(2023, 9, 30), "Feed", "", 450.0),
    ];
    *store.daily_yields.lock().unwrap() = vec![
        yield_record("y1", date(2023, 10, 30), 50.5),
        yield_record("y2", date(2023, 11, 1), 40.0),
    ];
    *store.milk_sales.lock().unwrap() = vec![MilkSale::priced(
        "s1",
        date(2023, 10, 30),
        "Ramesh",
        20.0,
        50.0,
    )];

    let service = LedgerService::new(Arc::new(store));
    let summary = service.monthly_summary(2023, 10).await.unwrap();

    assert_eq!(summary.operating_expenses, 500.0);
    assert_eq!(summary.milk_produced, 50.5);
    assert_eq!(summary.milk_sold, 20.0);
    assert_eq!(summary.revenue, 1000.0);
    assert_eq!(summary.net, 500.0);
}

#[tokio::test]
async fn test_monthly_summary_rejects_bad_month() {
    let service = LedgerService::new(Arc::new(MockFarmStore::new()));
    assert!(service.monthly_summary(2023, 13).await.is_err());
}

#[tokio::test]
async fn test_due_reminders_include_expenses_and_events() {
    let store = MockFarmStore::new();
    let mut rent = Expense::new("e1", date(2023, 10, 1), "Rent", "", 1000.0);
    rent.is_recurring = true;
    rent.recurrence_type = Some("Monthly".to_string());
    rent.next_due_date = Some(date(2023, 11, 1));
    let mut later = rent.clone();
    later.id = "e2".to_string();
    later.next_due_date = Some(date(2023, 12, 1));
    *store.expenses.lock().unwrap() = vec![rent, later];

    let mut vaccine = AnimalEvent::new("ev1", date(2023, 5, 1), "Gauri", EventType::Vaccination, "FMD");
    vaccine.next_due_date = Some(date(2023, 10, 15));
    *store.animal_events.lock().unwrap() = vec![vaccine];

    let service = LedgerService::new(Arc::new(store));
    let reminders = service.due_reminders(date(2023, 11, 5)).await.unwrap();

    assert_eq!(reminders.len(), 2);
    assert_eq!(reminders[0].kind, ReminderKind::AnimalEvent);
    assert_eq!(reminders[0].message, "Animal Gauri: Vaccination due on 2023-10-15");
    assert_eq!(reminders[1].kind, ReminderKind::RecurringExpense);
    assert_eq!(reminders[1].record_id, "e1");
}
