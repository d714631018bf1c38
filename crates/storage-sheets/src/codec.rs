//! Row codec between worksheet text cells and typed records.
//!
//! Decoding never fails as a whole. Each row either becomes a record or is
//! listed in [`ParseReport::skipped`] with a reason; recoverable field
//! problems (an empty amount, an unreadable optional date) are defaulted and
//! reported in [`ParseReport::warnings`].

use chrono::NaiveDate;
use serde::Serialize;

use dairy_core::expenses::Expense;
use dairy_core::livestock::{Animal, AnimalEvent, EventType};
use dairy_core::production::DailyYield;
use dairy_core::sales::{Buyer, EntryType, MilkSale, Payment};
use dairy_core::store::Collection;
use dairy_core::utils::time_utils::{format_date, parse_date};

/// One worksheet row as header/text pairs, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    row_number: usize,
    cells: Vec<(String, String)>,
}

impl RawRow {
    pub fn new(row_number: usize, cells: Vec<(String, String)>) -> Self {
        Self { row_number, cells }
    }

    /// Pairs `values` with `headers`. Missing trailing cells become empty
    /// text; cells beyond the header are dropped.
    pub fn from_values(row_number: usize, headers: &[String], values: &[String]) -> Self {
        let cells = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = values.get(i).cloned().unwrap_or_default();
                (header.clone(), value)
            })
            .collect();
        Self { row_number, cells }
    }

    /// 1-based position in the worksheet, header included.
    pub fn row_number(&self) -> usize {
        self.row_number
    }

    /// Cell text for `column`, or `""` when the column is absent.
    pub fn get(&self, column: &str) -> &str {
        self.cells
            .iter()
            .find(|(header, _)| header == column)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Text of the first of `columns` present in the row.
    pub fn get_any(&self, columns: &[&str]) -> &str {
        columns
            .iter()
            .find_map(|column| {
                self.cells
                    .iter()
                    .find(|(header, _)| header == column)
                    .map(|(_, value)| value.as_str())
            })
            .unwrap_or("")
    }

    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        let value = value.into();
        match self.cells.iter_mut().find(|(header, _)| header == column) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((column.to_string(), value)),
        }
    }

    /// Cell texts in `headers` order.
    pub fn cells_in(&self, headers: &[&str]) -> Vec<String> {
        headers.iter().map(|h| self.get(h).to_string()).collect()
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.trim().is_empty())
    }
}

/// Turns fetched worksheet values into raw rows. The first row is the
/// header; blank rows are dropped but keep their place in the numbering.
pub fn rows_from_values(values: &[Vec<String>]) -> Vec<RawRow> {
    let Some((header, body)) = values.split_first() else {
        return Vec::new();
    };
    let headers: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    body.iter()
        .enumerate()
        .map(|(i, values)| RawRow::from_values(i + 2, &headers, values))
        .filter(|row| !row.is_blank())
        .collect()
}

/// A row that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
}

/// A field that was defaulted while decoding a row that was kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldWarning {
    pub row: usize,
    pub column: String,
    pub value: String,
    pub message: String,
}

/// Outcome of decoding one worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseReport<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRow>,
    pub warnings: Vec<FieldWarning>,
}

impl<T> ParseReport<T> {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.warnings.is_empty()
    }
}

/// Reason a row was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct SkipReason(String);

impl SkipReason {
    fn missing(column: &str) -> Self {
        Self(format!("missing required field '{}'", column))
    }
}

/// A record type stored as one worksheet row.
pub trait SheetRecord: Sized {
    const COLLECTION: Collection;

    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, SkipReason>;

    /// Cell texts in [`Collection::headers`] order.
    fn encode(&self) -> Vec<String>;
}

/// Lenient field accessors over one row, collecting warnings as they go.
pub struct FieldReader<'a> {
    row: &'a RawRow,
    warnings: &'a mut Vec<FieldWarning>,
}

impl<'a> FieldReader<'a> {
    pub fn new(row: &'a RawRow, warnings: &'a mut Vec<FieldWarning>) -> Self {
        Self { row, warnings }
    }

    fn warn(&mut self, column: &str, value: &str, message: impl Into<String>) {
        self.warnings.push(FieldWarning {
            row: self.row.row_number(),
            column: column.to_string(),
            value: value.to_string(),
            message: message.into(),
        });
    }

    /// Cell text exactly as stored, surrounding whitespace included.
    pub fn text(&self, column: &str) -> String {
        self.row.get(column).to_string()
    }

    /// An empty cell is `None`.
    pub fn optional_text(&self, column: &str) -> Option<String> {
        Some(self.text(column)).filter(|value| !value.is_empty())
    }

    /// Whitespace-only counts as missing; otherwise the text is kept as is.
    pub fn required_text(&self, column: &str) -> Result<String, SkipReason> {
        let value = self.text(column);
        if value.trim().is_empty() {
            return Err(SkipReason::missing(column));
        }
        Ok(value)
    }

    pub fn required_date(&self, column: &str) -> Result<NaiveDate, SkipReason> {
        let raw = self.required_text(column)?;
        parse_date(&raw).ok_or_else(|| SkipReason(format!("unreadable date '{}' in '{}'", raw, column)))
    }

    /// Empty is `None` without a warning; unreadable is `None` with one.
    pub fn optional_date(&mut self, column: &str) -> Option<NaiveDate> {
        let raw = self.text(column);
        if raw.trim().is_empty() {
            return None;
        }
        let parsed = parse_date(&raw);
        if parsed.is_none() {
            self.warn(column, &raw, "unreadable date, left empty");
        }
        parsed
    }

    /// Trims, strips `,` separators, and falls back to 0.0 with a warning.
    pub fn number(&mut self, column: &str) -> f64 {
        let raw = self.row.get(column).to_string();
        let cleaned = raw.trim().replace(',', "");
        if cleaned.is_empty() {
            self.warn(column, &raw, "empty number, using 0");
            return 0.0;
        }
        match cleaned.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                self.warn(column, &raw, "not a number, using 0");
                0.0
            }
        }
    }

    /// Case-insensitive `"true"`; anything else is false.
    pub fn flag(&self, column: &str) -> bool {
        self.row.get(column).trim().eq_ignore_ascii_case("true")
    }

    /// Like [`text`](Self::text), trying several column names in turn.
    pub fn text_any(&self, columns: &[&str]) -> String {
        self.row.get_any(columns).to_string()
    }

    fn entry_type(&mut self, column: &str) -> EntryType {
        let raw = self.text(column);
        EntryType::from_label(&raw).unwrap_or_else(|| {
            self.warn(column, &raw, "unknown entry type, using Payment");
            EntryType::Payment
        })
    }

    fn event_type(&mut self, column: &str) -> EventType {
        let raw = self.text(column);
        EventType::from_label(&raw).unwrap_or_else(|| {
            self.warn(column, &raw, "unknown event type, using Other");
            EventType::Other
        })
    }
}

/// Decodes every row, never failing as a whole.
pub fn decode_rows<T: SheetRecord>(rows: &[RawRow]) -> ParseReport<T> {
    let mut report = ParseReport {
        records: Vec::with_capacity(rows.len()),
        skipped: Vec::new(),
        warnings: Vec::new(),
    };

    for row in rows {
        let mut row_warnings = Vec::new();
        let decoded = T::decode(&mut FieldReader::new(row, &mut row_warnings));
        match decoded {
            Ok(record) => {
                report.records.push(record);
                report.warnings.append(&mut row_warnings);
            }
            Err(SkipReason(reason)) => report.skipped.push(SkippedRow {
                row: row.row_number(),
                reason,
            }),
        }
    }
    report
}

fn number_cell(value: f64) -> String {
    value.to_string()
}

fn flag_cell(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

fn date_cell(value: Option<NaiveDate>) -> String {
    value.map(format_date).unwrap_or_default()
}

impl SheetRecord for Expense {
    const COLLECTION: Collection = Collection::Expenses;

    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, SkipReason> {
        let id = fields.required_text("id")?;
        let date = fields.required_date("date")?;
        let animal_id = fields.text_any(&["animal_id", "cow_id"]);
        Ok(Expense {
            id,
            date,
            name: fields.text("name"),
            description: fields.text("description"),
            amount: fields.number("amount"),
            is_recurring: fields.flag("is_recurring"),
            recurrence_type: fields.optional_text("recurrence_type"),
            next_due_date: fields.optional_date("next_due_date"),
            animal_id: Some(animal_id).filter(|a| !a.is_empty()),
        })
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            format_date(self.date),
            self.name.clone(),
            self.description.clone(),
            number_cell(self.amount),
            flag_cell(self.is_recurring),
            self.recurrence_type.clone().unwrap_or_default(),
            date_cell(self.next_due_date),
            self.animal_id.clone().unwrap_or_default(),
        ]
    }
}

impl SheetRecord for Buyer {
    const COLLECTION: Collection = Collection::Buyers;

    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, SkipReason> {
        let name = fields.required_text("name")?;
        Ok(Buyer {
            id: fields.optional_text("id"),
            name,
            default_rate: fields.number("default_rate"),
        })
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.id.clone().unwrap_or_default(),
            self.name.clone(),
            number_cell(self.default_rate),
        ]
    }
}

impl SheetRecord for MilkSale {
    const COLLECTION: Collection = Collection::MilkSales;

    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, SkipReason> {
        let id = fields.required_text("id")?;
        let date = fields.required_date("date")?;
        Ok(MilkSale {
            id,
            date,
            buyer_name: fields.text("buyer_name"),
            quantity: fields.number("quantity"),
            rate: fields.number("rate"),
            total_amount: fields.number("total_amount"),
        })
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            format_date(self.date),
            self.buyer_name.clone(),
            number_cell(self.quantity),
            number_cell(self.rate),
            number_cell(self.total_amount),
        ]
    }
}

impl SheetRecord for DailyYield {
    const COLLECTION: Collection = Collection::DailyYields;

    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, SkipReason> {
        let id = fields.required_text("id")?;
        let date = fields.required_date("date")?;
        Ok(DailyYield {
            id,
            date,
            quantity: fields.number("quantity"),
            notes: fields.text("notes"),
        })
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            format_date(self.date),
            number_cell(self.quantity),
            self.notes.clone(),
        ]
    }
}

impl SheetRecord for Payment {
    const COLLECTION: Collection = Collection::Payments;

    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, SkipReason> {
        let id = fields.required_text("id")?;
        let date = fields.required_date("date")?;
        Ok(Payment {
            id,
            date,
            buyer_name: fields.text("buyer_name"),
            entry_type: fields.entry_type("entry_type"),
            amount: fields.number("amount"),
            notes: fields.text("notes"),
        })
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            format_date(self.date),
            self.buyer_name.clone(),
            self.entry_type.as_str().to_string(),
            number_cell(self.amount),
            self.notes.clone(),
        ]
    }
}

impl SheetRecord for Animal {
    const COLLECTION: Collection = Collection::Animals;

    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, SkipReason> {
        let name = fields.required_text("name")?;
        let id = fields.optional_text("id").unwrap_or_else(|| name.clone());
        Ok(Animal {
            id,
            name,
            breed: fields.text("breed"),
            notes: fields.text("notes"),
            bought_date: fields.optional_date("bought_date"),
            bought_from: fields.optional_text("bought_from"),
            calf_birth_date: fields.optional_date("calf_birth_date"),
        })
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.breed.clone(),
            self.notes.clone(),
            date_cell(self.bought_date),
            self.bought_from.clone().unwrap_or_default(),
            date_cell(self.calf_birth_date),
        ]
    }
}

impl SheetRecord for AnimalEvent {
    const COLLECTION: Collection = Collection::AnimalEvents;

    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, SkipReason> {
        let id = fields.required_text("id")?;
        let date = fields.required_date("date")?;
        let animal_id = fields.text_any(&["animal_id", "cow_id"]);
        if animal_id.trim().is_empty() {
            fields.warn("animal_id", &animal_id, "no animal recorded");
        }
        // An empty cost is common for events without a bill.
        let cost = if fields.text("cost").trim().is_empty() {
            0.0
        } else {
            fields.number("cost")
        };
        Ok(AnimalEvent {
            id,
            date,
            animal_id,
            event_type: fields.event_type("event_type"),
            value: fields.text("value"),
            cost,
            next_due_date: fields.optional_date("next_due_date"),
            notes: fields.text("notes"),
        })
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            format_date(self.date),
            self.animal_id.clone(),
            self.event_type.as_str().to_string(),
            self.value.clone(),
            number_cell(self.cost),
            date_cell(self.next_due_date),
            self.notes.clone(),
        ]
    }
}
