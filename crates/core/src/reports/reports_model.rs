use chrono::NaiveDate;
use serde::Serialize;

/// Dashboard figures for one calendar month.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub operating_expenses: f64,
    pub milk_produced: f64,
    pub milk_sold: f64,
    pub revenue: f64,
    pub net: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ReminderKind {
    RecurringExpense,
    AnimalEvent,
}

/// Something whose next due date has arrived.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Reminder {
    pub kind: ReminderKind,
    pub record_id: String,
    pub due_date: NaiveDate,
    pub message: String,
}
