use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Serialize;

use dairy_core::constants::{DEFAULT_CACHE_TTL, DEFAULT_DOCUMENT_TITLE, DEFAULT_FETCH_DELAY};
use dairy_core::errors::{Error, Result};
use dairy_core::expenses::{Expense, ExpenseRepositoryTrait};
use dairy_core::livestock::{
    Animal, AnimalEvent, AnimalEventRepositoryTrait, AnimalRepositoryTrait,
};
use dairy_core::production::{DailyYield, DailyYieldRepositoryTrait};
use dairy_core::sales::{
    Buyer, BuyerRepositoryTrait, MilkSale, MilkSaleRepositoryTrait, Payment,
    PaymentRepositoryTrait,
};
use dairy_core::store::{Collection, FarmStore};

use crate::cache::RecordCache;
use crate::client::{SpreadsheetClient, Worksheet};
use crate::codec::{decode_rows, rows_from_values, ParseReport, RawRow, SheetRecord};
use crate::pacer::FetchPacer;

/// Settings for [`SheetsStore`].
#[derive(Debug, Clone)]
pub struct SheetsStoreConfig {
    pub document_title: String,
    pub cache_ttl: Duration,
    pub fetch_delay: Duration,
    pub new_worksheet_rows: u32,
    pub new_worksheet_cols: u32,
}

impl Default for SheetsStoreConfig {
    fn default() -> Self {
        Self {
            document_title: DEFAULT_DOCUMENT_TITLE.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            fetch_delay: DEFAULT_FETCH_DELAY,
            new_worksheet_rows: 1000,
            new_worksheet_cols: 20,
        }
    }
}

/// Counts from the most recent decode of one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParseSummary {
    pub records: usize,
    pub skipped: usize,
    pub warnings: usize,
}

/// Store backed by one remote spreadsheet document.
pub struct SheetsStore {
    client: Arc<dyn SpreadsheetClient>,
    document_id: String,
    worksheets: HashMap<Collection, Worksheet>,
    cache: RecordCache,
    pacer: FetchPacer,
    summaries: Mutex<HashMap<Collection, ParseSummary>>,
}

impl SheetsStore {
    /// Opens (or creates) the document and every worksheet.
    ///
    /// Any failure here is [`Error::Provisioning`]: without a writable
    /// document no operation can succeed, and the caller should fall back
    /// to another store.
    pub async fn connect(
        client: Arc<dyn SpreadsheetClient>,
        config: SheetsStoreConfig,
    ) -> Result<Self> {
        let title = config.document_title.clone();
        let remedy = |cause: String| {
            Error::Provisioning(format!(
                "could not open or create spreadsheet '{}': {}. Create a spreadsheet named '{}' \
                 manually and share it with {}",
                title,
                cause,
                title,
                client.identity()
            ))
        };

        let document_id = match client.find_document(&title).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                info!("Spreadsheet '{}' not found, creating it", title);
                client
                    .create_document(&title)
                    .await
                    .map_err(|e| remedy(e.to_string()))?
            }
            Err(e) => return Err(remedy(e.to_string())),
        };

        let existing = client
            .list_worksheets(&document_id)
            .await
            .map_err(|e| remedy(e.to_string()))?;

        let mut worksheets = HashMap::new();
        for collection in Collection::ALL {
            let sheet = match existing.iter().find(|s| s.title == collection.name()) {
                Some(sheet) => sheet.clone(),
                None => {
                    debug!("Creating worksheet '{}'", collection);
                    let sheet = client
                        .add_worksheet(
                            &document_id,
                            collection.name(),
                            config.new_worksheet_rows,
                            config.new_worksheet_cols,
                        )
                        .await
                        .map_err(|e| remedy(e.to_string()))?;
                    let header = collection.headers().iter().map(|h| h.to_string()).collect();
                    client
                        .append_row(&sheet, header)
                        .await
                        .map_err(|e| remedy(e.to_string()))?;
                    sheet
                }
            };
            worksheets.insert(collection, sheet);
        }

        info!(
            "Using spreadsheet '{}' ({}) as {}",
            title,
            document_id,
            client.identity()
        );

        Ok(Self {
            client,
            document_id,
            worksheets,
            cache: RecordCache::new(config.cache_ttl),
            pacer: FetchPacer::new(config.fetch_delay),
            summaries: Mutex::new(HashMap::new()),
        })
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Counts from the last time `collection` was decoded, if it has been.
    pub fn last_parse_summary(&self, collection: Collection) -> Option<ParseSummary> {
        self.lock_summaries().get(&collection).copied()
    }

    /// Drops every cached collection.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn lock_summaries(&self) -> MutexGuard<'_, HashMap<Collection, ParseSummary>> {
        self.summaries.lock().unwrap_or_else(|poisoned| {
            warn!("Parse summary mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn sheet(&self, collection: Collection) -> Result<&Worksheet> {
        self.worksheets
            .get(&collection)
            .ok_or_else(|| Error::Unexpected(format!("worksheet '{}' not provisioned", collection)))
    }

    /// Paced, uncached fetch. Errors propagate.
    async fn fetch_rows(&self, collection: Collection) -> Result<Vec<RawRow>> {
        let sheet = self.sheet(collection)?;
        self.pacer.wait(collection.name()).await;
        let values = self.client.fetch_values(sheet).await?;
        Ok(rows_from_values(&values))
    }

    /// Rows through the cache. A failed fetch is logged and yields an empty,
    /// uncached result.
    async fn cached_rows(&self, collection: Collection) -> Arc<Vec<RawRow>> {
        if let Some(rows) = self.cache.get(collection).await {
            debug!("Cache hit for '{}'", collection);
            return rows;
        }

        match self.fetch_rows(collection).await {
            Ok(rows) => {
                let rows = Arc::new(rows);
                self.cache.insert(collection, rows.clone()).await;
                rows
            }
            Err(e) => {
                warn!("Failed to fetch '{}', treating as empty: {}", collection, e);
                Arc::new(Vec::new())
            }
        }
    }

    async fn load<T: SheetRecord>(&self) -> Vec<T> {
        let rows = self.cached_rows(T::COLLECTION).await;
        let report: ParseReport<T> = decode_rows(&rows);
        self.record_report(T::COLLECTION, &report);
        report.records
    }

    fn record_report<T>(&self, collection: Collection, report: &ParseReport<T>) {
        for skipped in &report.skipped {
            warn!(
                "Skipping row {} of '{}': {}",
                skipped.row, collection, skipped.reason
            );
        }
        for warning in &report.warnings {
            warn!(
                "Row {} of '{}', column '{}' ({:?}): {}",
                warning.row, collection, warning.column, warning.value, warning.message
            );
        }
        self.lock_summaries().insert(
            collection,
            ParseSummary {
                records: report.records.len(),
                skipped: report.skipped.len(),
                warnings: report.warnings.len(),
            },
        );
    }

    /// Whether a row with this key-column value is visible through the cache.
    async fn key_exists(&self, collection: Collection, key: &str) -> bool {
        let column = collection.key_column();
        self.cached_rows(collection)
            .await
            .iter()
            .any(|row| row.get(column) == key)
    }

    /// Fresh rows whose key column equals `key`, in worksheet order.
    async fn locate(&self, collection: Collection, key: &str) -> Result<Vec<RawRow>> {
        let column = collection.key_column();
        let rows = self.fetch_rows(collection).await?;
        Ok(rows
            .into_iter()
            .filter(|row| row.get(column) == key)
            .collect())
    }

    async fn append<T: SheetRecord>(&self, record: &T) -> Result<usize> {
        let sheet = self.sheet(T::COLLECTION)?;
        self.client.append_row(sheet, record.encode()).await?;
        self.cache.invalidate(T::COLLECTION).await;
        Ok(1)
    }

    /// Overwrites the first row keyed by `key`.
    async fn replace<T: SheetRecord>(&self, key: &str, record: &T) -> Result<usize> {
        let Some(target) = self.locate(T::COLLECTION, key).await?.into_iter().next() else {
            debug!("No row '{}' in '{}', nothing to update", key, T::COLLECTION);
            return Ok(0);
        };
        let sheet = self.sheet(T::COLLECTION)?;
        self.client
            .update_row(sheet, target.row_number(), record.encode())
            .await?;
        self.cache.invalidate(T::COLLECTION).await;
        Ok(1)
    }

    /// Deletes every row keyed by `key`, bottom-up so earlier row numbers
    /// stay valid.
    async fn remove(&self, collection: Collection, key: &str) -> Result<usize> {
        let targets: Vec<usize> = self
            .locate(collection, key)
            .await?
            .iter()
            .map(RawRow::row_number)
            .collect();
        if targets.is_empty() {
            debug!("No row '{}' in '{}', nothing to delete", key, collection);
            return Ok(0);
        }

        let sheet = self.sheet(collection)?;
        for row_number in targets.iter().rev() {
            self.client.delete_row(sheet, *row_number).await?;
        }
        self.cache.invalidate(collection).await;
        Ok(targets.len())
    }
}

#[async_trait]
impl ExpenseRepositoryTrait for SheetsStore {
    async fn get_expenses(&self) -> Result<Vec<Expense>> {
        Ok(self.load().await)
    }

    async fn add_expense(&self, expense: Expense) -> Result<usize> {
        self.append(&expense).await
    }

    async fn update_expense(&self, expense: Expense) -> Result<usize> {
        self.replace(&expense.id, &expense).await
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<usize> {
        self.remove(Collection::Expenses, expense_id).await
    }
}

#[async_trait]
impl BuyerRepositoryTrait for SheetsStore {
    async fn get_buyers(&self) -> Result<Vec<Buyer>> {
        Ok(self.load().await)
    }

    async fn add_buyer(&self, buyer: Buyer) -> Result<usize> {
        if self.key_exists(Collection::Buyers, &buyer.name).await {
            debug!("Buyer '{}' already exists, skipping", buyer.name);
            return Ok(0);
        }
        self.append(&buyer).await
    }

    async fn update_buyer(&self, buyer_name: &str, new_rate: f64) -> Result<usize> {
        let targets = self.locate(Collection::Buyers, buyer_name).await?;
        if targets.is_empty() {
            return Ok(0);
        }

        let sheet = self.sheet(Collection::Buyers)?;
        let headers = Collection::Buyers.headers();
        for mut row in targets.iter().cloned() {
            row.set("default_rate", new_rate.to_string());
            self.client
                .update_row(sheet, row.row_number(), row.cells_in(headers))
                .await?;
        }
        self.cache.invalidate(Collection::Buyers).await;
        Ok(targets.len())
    }

    async fn delete_buyer(&self, buyer_name: &str) -> Result<usize> {
        self.remove(Collection::Buyers, buyer_name).await
    }
}

#[async_trait]
impl MilkSaleRepositoryTrait for SheetsStore {
    async fn get_milk_sales(&self) -> Result<Vec<MilkSale>> {
        Ok(self.load().await)
    }

    async fn add_milk_sale(&self, sale: MilkSale) -> Result<usize> {
        self.append(&sale).await
    }

    async fn update_milk_sale(&self, sale: MilkSale) -> Result<usize> {
        self.replace(&sale.id, &sale).await
    }

    async fn delete_milk_sale(&self, sale_id: &str) -> Result<usize> {
        self.remove(Collection::MilkSales, sale_id).await
    }
}

#[async_trait]
impl DailyYieldRepositoryTrait for SheetsStore {
    async fn get_daily_yields(&self) -> Result<Vec<DailyYield>> {
        Ok(self.load().await)
    }

    async fn add_daily_yield(&self, yield_record: DailyYield) -> Result<usize> {
        self.append(&yield_record).await
    }

    async fn update_daily_yield(&self, yield_record: DailyYield) -> Result<usize> {
        self.replace(&yield_record.id, &yield_record).await
    }

    async fn delete_daily_yield(&self, yield_id: &str) -> Result<usize> {
        self.remove(Collection::DailyYields, yield_id).await
    }
}

#[async_trait]
impl PaymentRepositoryTrait for SheetsStore {
    async fn get_payments(&self) -> Result<Vec<Payment>> {
        Ok(self.load().await)
    }

    async fn add_payment(&self, payment: Payment) -> Result<usize> {
        self.append(&payment).await
    }

    async fn update_payment(&self, payment: Payment) -> Result<usize> {
        self.replace(&payment.id, &payment).await
    }

    async fn delete_payment(&self, payment_id: &str) -> Result<usize> {
        self.remove(Collection::Payments, payment_id).await
    }
}

#[async_trait]
impl AnimalRepositoryTrait for SheetsStore {
    async fn get_animals(&self) -> Result<Vec<Animal>> {
        Ok(self.load().await)
    }

    async fn add_animal(&self, animal: Animal) -> Result<usize> {
        let animal = animal.normalized();
        let exists = self
            .load::<Animal>()
            .await
            .iter()
            .any(|a| a.name == animal.name);
        if exists {
            debug!("Animal '{}' already exists, skipping", animal.name);
            return Ok(0);
        }
        self.append(&animal).await
    }

    async fn update_animal(&self, animal: Animal) -> Result<usize> {
        animal.ensure_name_is_key()?;
        self.replace(&animal.id, &animal).await
    }

    async fn delete_animal(&self, animal_id: &str) -> Result<usize> {
        self.remove(Collection::Animals, animal_id).await
    }
}

#[async_trait]
impl AnimalEventRepositoryTrait for SheetsStore {
    async fn get_animal_events(&self) -> Result<Vec<AnimalEvent>> {
        Ok(self.load().await)
    }

    async fn add_animal_event(&self, event: AnimalEvent) -> Result<usize> {
        self.append(&event).await
    }

    async fn update_animal_event(&self, event: AnimalEvent) -> Result<usize> {
        self.replace(&event.id, &event).await
    }

    async fn delete_animal_event(&self, event_id: &str) -> Result<usize> {
        self.remove(Collection::AnimalEvents, event_id).await
    }
}

impl FarmStore for SheetsStore {
    fn backend_name(&self) -> &'static str {
        "google-sheets"
    }
}
