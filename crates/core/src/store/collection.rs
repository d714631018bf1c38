use std::fmt;

/// The seven record collections a store persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Expenses,
    Buyers,
    MilkSales,
    DailyYields,
    Payments,
    Animals,
    AnimalEvents,
}

const EXPENSE_HEADERS: &[&str] = &[
    "id",
    "date",
    "name",
    "description",
    "amount",
    "is_recurring",
    "recurrence_type",
    "next_due_date",
    "animal_id",
];
const BUYER_HEADERS: &[&str] = &["id", "name", "default_rate"];
const MILK_SALE_HEADERS: &[&str] = &["id", "date", "buyer_name", "quantity", "rate", "total_amount"];
const DAILY_YIELD_HEADERS: &[&str] = &["id", "date", "quantity", "notes"];
const PAYMENT_HEADERS: &[&str] = &["id", "date", "buyer_name", "entry_type", "amount", "notes"];
const ANIMAL_HEADERS: &[&str] = &[
    "id",
    "name",
    "breed",
    "notes",
    "bought_date",
    "bought_from",
    "calf_birth_date",
];
const ANIMAL_EVENT_HEADERS: &[&str] = &[
    "id",
    "date",
    "animal_id",
    "event_type",
    "value",
    "cost",
    "next_due_date",
    "notes",
];

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Expenses,
        Collection::Buyers,
        Collection::MilkSales,
        Collection::DailyYields,
        Collection::Payments,
        Collection::Animals,
        Collection::AnimalEvents,
    ];

    /// Worksheet title in the remote store, and file stem in the file store.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Expenses => "expenses",
            Collection::Buyers => "buyers",
            Collection::MilkSales => "milk_sales",
            Collection::DailyYields => "daily_yields",
            Collection::Payments => "payments",
            Collection::Animals => "cows",
            Collection::AnimalEvents => "cow_events",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }

    /// Column order of the remote worksheet; also the field order of the
    /// record type.
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            Collection::Expenses => EXPENSE_HEADERS,
            Collection::Buyers => BUYER_HEADERS,
            Collection::MilkSales => MILK_SALE_HEADERS,
            Collection::DailyYields => DAILY_YIELD_HEADERS,
            Collection::Payments => PAYMENT_HEADERS,
            Collection::Animals => ANIMAL_HEADERS,
            Collection::AnimalEvents => ANIMAL_EVENT_HEADERS,
        }
    }

    /// Field that update and delete operations match on.
    pub fn key_column(&self) -> &'static str {
        match self {
            Collection::Buyers => "name",
            _ => "id",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Replaces the first record matching `matches`. Returns 1 if a record was
/// replaced, 0 otherwise.
pub fn replace_first<T>(records: &mut [T], replacement: T, matches: impl Fn(&T) -> bool) -> usize {
    match records.iter_mut().find(|r| matches(r)) {
        Some(slot) => {
            *slot = replacement;
            1
        }
        None => 0,
    }
}

/// Removes every record matching `matches` and returns how many were removed.
pub fn remove_where<T>(records: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> usize {
    let before = records.len();
    records.retain(|r| !matches(r));
    before - records.len()
}
