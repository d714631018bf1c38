//! Livestock domain models.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::expenses::Expense;

/// An animal of the herd. Its id is always its name; renaming is not
/// supported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Animal {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub bought_date: Option<NaiveDate>,
    #[serde(default)]
    pub bought_from: Option<String>,
    #[serde(default)]
    pub calf_birth_date: Option<NaiveDate>,
}

impl Animal {
    pub fn new(name: impl Into<String>, breed: impl Into<String>, notes: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            breed: breed.into(),
            notes: notes.into(),
            bought_date: None,
            bought_from: None,
            calf_birth_date: None,
        }
    }

    /// Restores `id == name` on a record built by hand.
    pub fn normalized(mut self) -> Self {
        self.id = self.name.clone();
        self
    }

    /// Rejects a record whose name differs from its id, which would amount
    /// to a rename.
    pub fn ensure_name_is_key(&self) -> Result<()> {
        if self.id != self.name {
            return Err(ValidationError::InvalidInput(format!(
                "animal '{}' cannot be renamed to '{}'",
                self.id, self.name
            ))
            .into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventType {
    Vaccination,
    #[serde(alias = "Doctor Visit")]
    Doctor,
    Yield,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Vaccination => "Vaccination",
            EventType::Doctor => "Doctor",
            EventType::Yield => "Yield",
            EventType::Other => "Other",
        }
    }

    /// Case-insensitive lookup of a stored label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "vaccination" => Some(EventType::Vaccination),
            "doctor" | "doctor visit" => Some(EventType::Doctor),
            "yield" => Some(EventType::Yield),
            "other" => Some(EventType::Other),
            _ => None,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that happened to one animal. `value` is free text such as
/// "12.5 Litres" or a vaccine name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimalEvent {
    pub id: String,
    pub date: NaiveDate,
    #[serde(alias = "cow_id")]
    pub animal_id: String,
    pub event_type: EventType,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub next_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

impl AnimalEvent {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        animal_id: impl Into<String>,
        event_type: EventType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            animal_id: animal_id.into(),
            event_type,
            value: value.into(),
            cost: 0.0,
            next_due_date: None,
            notes: String::new(),
        }
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_due_date.is_some_and(|due| due <= today)
    }
}

/// Outcome of recording an event: the saved event and, when it had a cost,
/// the expense booked for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub event: AnimalEvent,
    pub expense: Option<Expense>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_animal_uses_name_as_id() {
        let animal = Animal::new("Gauri", "HF", "");
        assert_eq!(animal.id, "Gauri");

        let mut renamed = animal.clone();
        renamed.id = "something-else".to_string();
        assert!(renamed.ensure_name_is_key().is_err());
        assert_eq!(renamed.normalized().id, "Gauri");
        assert!(animal.ensure_name_is_key().is_ok());
    }

    #[test]
    fn test_event_reads_legacy_layout() {
        let json = r#"{
            "date": "2023-01-01",
            "cow_id": "C1",
            "event_type": "Doctor Visit",
            "value": "Checkup",
            "id": "E1"
        }"#;
        let event: AnimalEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.animal_id, "C1");
        assert_eq!(event.event_type, EventType::Doctor);
        assert_eq!(event.cost, 0.0);
        assert_eq!(event.notes, "");
    }

    #[test]
    fn test_event_type_labels() {
        assert_eq!(EventType::from_label("doctor visit"), Some(EventType::Doctor));
        assert_eq!(EventType::from_label("YIELD"), Some(EventType::Yield));
        assert_eq!(EventType::from_label("deworming"), None);
        assert_eq!(EventType::Vaccination.to_string(), "Vaccination");
    }
}
