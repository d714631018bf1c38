//! Unit tests for the livestock service.

use super::*;
use crate::store::test_store::MockFarmStore;
use chrono::NaiveDate;
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_record_event_without_cost_books_no_expense() {
    let store = Arc::new(MockFarmStore::new());
    let service = LivestockService::new(store.clone());

    let event = AnimalEvent::new("E1", date(2023, 1, 1), "C1", EventType::Yield, "10L");
    let recorded = service.record_event(event).await.unwrap();

    assert!(recorded.expense.is_none());
    assert_eq!(store.animal_events.lock().unwrap().len(), 1);
    assert!(store.expenses.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_record_event_with_cost_books_linked_expense() {
    let store = Arc::new(MockFarmStore::new());
    let service = LivestockService::new(store.clone());

    let mut event = AnimalEvent::new("E1", date(2023, 3, 4), "Gauri", EventType::Doctor, "Checkup");
    event.cost = 350.0;
    let recorded = service.record_event(event).await.unwrap();

    let expense = recorded.expense.expect("expense should be booked");
    assert_eq!(expense.name, "Animal Expense - Doctor");
    assert_eq!(expense.description, "Animal Gauri - Doctor: Checkup");
    assert_eq!(expense.amount, 350.0);
    assert_eq!(expense.date, date(2023, 3, 4));
    assert_eq!(expense.animal_id.as_deref(), Some("Gauri"));
    assert!(!expense.is_recurring);
    assert_eq!(store.expenses.lock().unwrap().as_slice(), &[expense]);
}

#[tokio::test]
async fn test_failed_expense_leaves_event_saved() {
    let store = Arc::new(MockFarmStore::new().failing_expense_writes());
    let service = LivestockService::new(store.clone());

    let mut event = AnimalEvent::new("E1", date(2023, 3, 4), "Gauri", EventType::Vaccination, "FMD");
    event.cost = 120.0;
    let result = service.record_event(event).await;

    assert!(result.is_err());
    assert_eq!(store.animal_events.lock().unwrap().len(), 1);
    assert!(store.expenses.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_events_for_animal_newest_first() {
    let store = Arc::new(MockFarmStore::new());
    *store.animal_events.lock().unwrap() = vec![
        AnimalEvent::new("E1", date(2023, 1, 1), "Gauri", EventType::Yield, "10L"),
        AnimalEvent::new("E2", date(2023, 2, 1), "Kamdhenu", EventType::Yield, "8L"),
        AnimalEvent::new("E3", date(2023, 3, 1), "Gauri", EventType::Yield, "11L"),
    ];
    let service = LivestockService::new(store);

    let events = service.events_for_animal("Gauri").await.unwrap();
    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["E3", "E1"]);
}
