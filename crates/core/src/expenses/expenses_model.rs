//! Expense domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An operating expense of the farm.
///
/// `recurrence_type` and `next_due_date` only carry meaning when
/// `is_recurring` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: String,
    pub date: NaiveDate,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_type: Option<String>,
    #[serde(default)]
    pub next_due_date: Option<NaiveDate>,
    #[serde(default, alias = "cow_id")]
    pub animal_id: Option<String>,
}

impl Expense {
    /// A one-off expense with no recurrence and no linked animal.
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        name: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            name: name.into(),
            description: description.into(),
            amount,
            is_recurring: false,
            recurrence_type: None,
            next_due_date: None,
            animal_id: None,
        }
    }

    /// Whether a recurring expense is due on or before `today`.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.is_recurring && self.next_due_date.is_some_and(|due| due <= today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reads_legacy_cow_id_key() {
        let json = r#"{
            "id": "e1",
            "date": "2023-10-27",
            "name": "Vet",
            "description": "Checkup",
            "amount": 300.0,
            "is_recurring": false,
            "recurrence_type": null,
            "next_due_date": null,
            "cow_id": "Gauri"
        }"#;
        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.animal_id.as_deref(), Some("Gauri"));
        assert_eq!(expense.date, date(2023, 10, 27));
    }

    #[test]
    fn test_serializes_snake_case_keys() {
        let expense = Expense::new("e1", date(2023, 10, 27), "Feed", "", 500.0);
        let value = serde_json::to_value(&expense).unwrap();
        assert_eq!(value["date"], "2023-10-27");
        assert_eq!(value["is_recurring"], false);
        assert!(value.get("animal_id").is_some());
        assert!(value.get("next_due_date").unwrap().is_null());
    }

    #[test]
    fn test_is_due_requires_recurrence() {
        let mut expense = Expense::new("e1", date(2023, 10, 1), "Rent", "", 1000.0);
        expense.next_due_date = Some(date(2023, 11, 1));
        assert!(!expense.is_due(date(2023, 11, 2)));

        expense.is_recurring = true;
        assert!(expense.is_due(date(2023, 11, 1)));
        assert!(!expense.is_due(date(2023, 10, 31)));
    }
}
