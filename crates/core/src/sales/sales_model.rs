//! Milk sales domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A regular milk buyer. The name is the buyer's key; `id` is informational.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Buyer {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub default_rate: f64,
}

impl Buyer {
    pub fn new(name: impl Into<String>, default_rate: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            default_rate,
        }
    }
}

/// A single milk delivery. `total_amount` is computed by the caller and
/// stored as given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MilkSale {
    pub id: String,
    pub date: NaiveDate,
    pub buyer_name: String,
    pub quantity: f64,
    pub rate: f64,
    pub total_amount: f64,
}

impl MilkSale {
    /// Builds a sale priced at `quantity * rate`.
    pub fn priced(
        id: impl Into<String>,
        date: NaiveDate,
        buyer_name: impl Into<String>,
        quantity: f64,
        rate: f64,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            buyer_name: buyer_name.into(),
            quantity,
            rate,
            total_amount: quantity * rate,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntryType {
    Payment,
    Advance,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Payment => "Payment",
            EntryType::Advance => "Advance",
        }
    }

    /// Case-insensitive lookup of a stored label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "payment" => Some(EntryType::Payment),
            "advance" => Some(EntryType::Advance),
            _ => None,
        }
    }
}

/// Money received from a buyer, either settling sales or paid in advance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: String,
    pub date: NaiveDate,
    pub buyer_name: String,
    pub entry_type: EntryType,
    pub amount: f64,
    #[serde(default)]
    pub notes: String,
}

/// Outstanding position of one buyer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BuyerBalance {
    pub buyer_name: String,
    pub total_sales: f64,
    pub total_paid: f64,
    pub balance: f64,
}
