use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One milking record. Several records may share a date; they are summed by
/// consumers, never merged by a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyYield {
    pub id: String,
    pub date: NaiveDate,
    pub quantity: f64,
    #[serde(default)]
    pub notes: String,
}

/// Sum of all yield records of one date.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YieldTotal {
    pub date: NaiveDate,
    pub quantity: f64,
    pub records: usize,
}
