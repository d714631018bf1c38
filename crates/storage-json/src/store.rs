use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;

use dairy_core::errors::{Error, Result, StorageError};
use dairy_core::expenses::{Expense, ExpenseRepositoryTrait};
use dairy_core::livestock::{
    Animal, AnimalEvent, AnimalEventRepositoryTrait, AnimalRepositoryTrait,
};
use dairy_core::production::{DailyYield, DailyYieldRepositoryTrait};
use dairy_core::sales::{
    Buyer, BuyerRepositoryTrait, MilkSale, MilkSaleRepositoryTrait, Payment,
    PaymentRepositoryTrait,
};
use dairy_core::store::{remove_where, replace_first, Collection, FarmStore};

/// File-backed store: one JSON array per collection in a single directory.
///
/// File access is blocking `std::fs` inside the async methods. Each call is a
/// short read-modify-write under `lock` with no await point while it is held,
/// so concurrent callers are serialised rather than interleaved.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens the store, creating the directory and seeding every missing
    /// collection file with `[]`. Existing files are left untouched.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;

        for collection in Collection::ALL {
            let path = dir.join(collection.file_name());
            if !path.exists() {
                fs::write(&path, "[]").map_err(|e| StorageError::io(&path, e))?;
                debug!("Initialized empty collection file {}", path.display());
            }
        }
        info!("Using local JSON store at {}", dir.display());

        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| Error::Unexpected("JSON store lock poisoned".into()))
    }

    fn load<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        let _guard = self.lock()?;
        self.read_locked(collection)
    }

    /// Read-modify-write of one collection. `op` returns how many records it
    /// changed; the file is only rewritten when that is non-zero.
    fn modify<T, F>(&self, collection: Collection, op: F) -> Result<usize>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> usize,
    {
        let _guard = self.lock()?;
        let mut records: Vec<T> = self.read_locked(collection)?;
        let changed = op(&mut records);
        if changed > 0 {
            self.write_locked(collection, &records)?;
        }
        debug!("{}: {} record(s) changed", collection, changed);
        Ok(changed)
    }

    fn read_locked<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        let path = self.path_for(collection);
        let raw = fs::read(&path).map_err(|e| StorageError::io(&path, e))?;
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&raw).map_err(|e| StorageError::corrupt(&path, e))?)
    }

    fn write_locked<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<()> {
        let path = self.path_for(collection);
        let json =
            serde_json::to_string_pretty(records).map_err(|e| StorageError::corrupt(&path, e))?;
        fs::write(&path, json).map_err(|e| StorageError::io(&path, e))?;
        Ok(())
    }
}

#[async_trait]
impl ExpenseRepositoryTrait for JsonFileStore {
    async fn get_expenses(&self) -> Result<Vec<Expense>> {
        self.load(Collection::Expenses)
    }

    async fn add_expense(&self, expense: Expense) -> Result<usize> {
        self.modify(Collection::Expenses, |records: &mut Vec<Expense>| {
            records.push(expense);
            1
        })
    }

    async fn update_expense(&self, expense: Expense) -> Result<usize> {
        let id = expense.id.clone();
        self.modify(Collection::Expenses, |records: &mut Vec<Expense>| {
            replace_first(records, expense, |e: &Expense| e.id == id)
        })
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<usize> {
        self.modify(Collection::Expenses, |records: &mut Vec<Expense>| {
            remove_where(records, |e: &Expense| e.id == expense_id)
        })
    }
}

#[async_trait]
impl BuyerRepositoryTrait for JsonFileStore {
    async fn get_buyers(&self) -> Result<Vec<Buyer>> {
        self.load(Collection::Buyers)
    }

    async fn add_buyer(&self, buyer: Buyer) -> Result<usize> {
        self.modify(Collection::Buyers, |records: &mut Vec<Buyer>| {
            if records.iter().any(|b| b.name == buyer.name) {
                debug!("Buyer '{}' already exists, skipping", buyer.name);
                return 0;
            }
            records.push(buyer);
            1
        })
    }

    async fn update_buyer(&self, buyer_name: &str, new_rate: f64) -> Result<usize> {
        self.modify(Collection::Buyers, |records: &mut Vec<Buyer>| {
            let mut updated = 0;
            for buyer in records.iter_mut().filter(|b| b.name == buyer_name) {
                buyer.default_rate = new_rate;
                updated += 1;
            }
            updated
        })
    }

    async fn delete_buyer(&self, buyer_name: &str) -> Result<usize> {
        self.modify(Collection::Buyers, |records: &mut Vec<Buyer>| {
            remove_where(records, |b: &Buyer| b.name == buyer_name)
        })
    }
}

#[async_trait]
impl MilkSaleRepositoryTrait for JsonFileStore {
    async fn get_milk_sales(&self) -> Result<Vec<MilkSale>> {
        self.load(Collection::MilkSales)
    }

    async fn add_milk_sale(&self, sale: MilkSale) -> Result<usize> {
        self.modify(Collection::MilkSales, |records: &mut Vec<MilkSale>| {
            records.push(sale);
            1
        })
    }

    async fn update_milk_sale(&self, sale: MilkSale) -> Result<usize> {
        let id = sale.id.clone();
        self.modify(Collection::MilkSales, |records: &mut Vec<MilkSale>| {
            replace_first(records, sale, |s: &MilkSale| s.id == id)
        })
    }

    async fn delete_milk_sale(&self, sale_id: &str) -> Result<usize> {
        self.modify(Collection::MilkSales, |records: &mut Vec<MilkSale>| {
            remove_where(records, |s: &MilkSale| s.id == sale_id)
        })
    }
}

#[async_trait]
impl DailyYieldRepositoryTrait for JsonFileStore {
    async fn get_daily_yields(&self) -> Result<Vec<DailyYield>> {
        self.load(Collection::DailyYields)
    }

    async fn add_daily_yield(&self, yield_record: DailyYield) -> Result<usize> {
        self.modify(Collection::DailyYields, |records: &mut Vec<DailyYield>| {
            records.push(yield_record);
            1
        })
    }

    async fn update_daily_yield(&self, yield_record: DailyYield) -> Result<usize> {
        let id = yield_record.id.clone();
        self.modify(Collection::DailyYields, |records: &mut Vec<DailyYield>| {
            replace_first(records, yield_record, |y: &DailyYield| y.id == id)
        })
    }

    async fn delete_daily_yield(&self, yield_id: &str) -> Result<usize> {
        self.modify(Collection::DailyYields, |records: &mut Vec<DailyYield>| {
            remove_where(records, |y: &DailyYield| y.id == yield_id)
        })
    }
}

#[async_trait]
impl PaymentRepositoryTrait for JsonFileStore {
    async fn get_payments(&self) -> Result<Vec<Payment>> {
        self.load(Collection::Payments)
    }

    async fn add_payment(&self, payment: Payment) -> Result<usize> {
        self.modify(Collection::Payments, |records: &mut Vec<Payment>| {
            records.push(payment);
            1
        })
    }

    async fn update_payment(&self, payment: Payment) -> Result<usize> {
        let id = payment.id.clone();
        self.modify(Collection::Payments, |records: &mut Vec<Payment>| {
            replace_first(records, payment, |p: &Payment| p.id == id)
        })
    }

    async fn delete_payment(&self, payment_id: &str) -> Result<usize> {
        self.modify(Collection::Payments, |records: &mut Vec<Payment>| {
            remove_where(records, |p: &Payment| p.id == payment_id)
        })
    }
}

#[async_trait]
impl AnimalRepositoryTrait for JsonFileStore {
    async fn get_animals(&self) -> Result<Vec<Animal>> {
        self.load(Collection::Animals)
    }

    async fn add_animal(&self, animal: Animal) -> Result<usize> {
        let animal = animal.normalized();
        self.modify(Collection::Animals, |records: &mut Vec<Animal>| {
            if records.iter().any(|a| a.name == animal.name) {
                debug!("Animal '{}' already exists, skipping", animal.name);
                return 0;
            }
            records.push(animal);
            1
        })
    }

    async fn update_animal(&self, animal: Animal) -> Result<usize> {
        animal.ensure_name_is_key()?;
        let id = animal.id.clone();
        self.modify(Collection::Animals, |records: &mut Vec<Animal>| {
            replace_first(records, animal, |a: &Animal| a.id == id)
        })
    }

    async fn delete_animal(&self, animal_id: &str) -> Result<usize> {
        self.modify(Collection::Animals, |records: &mut Vec<Animal>| {
            remove_where(records, |a: &Animal| a.id == animal_id)
        })
    }
}

#[async_trait]
impl AnimalEventRepositoryTrait for JsonFileStore {
    async fn get_animal_events(&self) -> Result<Vec<AnimalEvent>> {
        self.load(Collection::AnimalEvents)
    }

    async fn add_animal_event(&self, event: AnimalEvent) -> Result<usize> {
        self.modify(Collection::AnimalEvents, |records: &mut Vec<AnimalEvent>| {
            records.push(event);
            1
        })
    }

    async fn update_animal_event(&self, event: AnimalEvent) -> Result<usize> {
        let id = event.id.clone();
        self.modify(Collection::AnimalEvents, |records: &mut Vec<AnimalEvent>| {
            replace_first(records, event, |e: &AnimalEvent| e.id == id)
        })
    }

    async fn delete_animal_event(&self, event_id: &str) -> Result<usize> {
        self.modify(Collection::AnimalEvents, |records: &mut Vec<AnimalEvent>| {
            remove_where(records, |e: &AnimalEvent| e.id == event_id)
        })
    }
}

impl FarmStore for JsonFileStore {
    fn backend_name(&self) -> &'static str {
        "local-json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn creates_every_collection_file() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("local_data");
        let store = JsonFileStore::new(&data_dir).unwrap();

        for collection in Collection::ALL {
            let raw = fs::read_to_string(store.path_for(collection)).unwrap();
            assert_eq!(raw, "[]", "{}", collection);
        }
    }

    #[test]
    fn keeps_existing_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("buyers.json");
        fs::write(&path, r#"[{"id": null, "name": "Ramesh", "default_rate": 55.0}]"#).unwrap();

        JsonFileStore::new(dir.path()).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Ramesh"));
    }

    #[tokio::test]
    async fn reads_blank_file_as_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        fs::write(store.path_for(Collection::Payments), "  \n").unwrap();

        assert!(store.get_payments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        fs::write(store.path_for(Collection::Expenses), "[{not json").unwrap();

        let err = store.get_expenses().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn writes_pretty_printed_snake_case() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        let sale = MilkSale::priced("s1", date(2023, 10, 30), "Ramesh", 10.0, 55.0);
        store.add_milk_sale(sale).await.unwrap();

        let raw = fs::read_to_string(store.path_for(Collection::MilkSales)).unwrap();
        assert!(raw.contains("\n  {"));
        assert!(raw.contains("\"buyer_name\": \"Ramesh\""));
        assert!(raw.contains("\"date\": \"2023-10-30\""));
    }

    #[tokio::test]
    async fn rejects_animal_rename() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        store.add_animal(Animal::new("C1", "HF", "")).await.unwrap();

        let mut renamed = Animal::new("C1", "HF", "");
        renamed.name = "C2".to_string();
        assert!(store.update_animal(renamed).await.is_err());
        assert_eq!(store.get_animals().await.unwrap()[0].name, "C1");
    }

    #[tokio::test]
    async fn add_animal_normalizes_id() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        let mut animal = Animal::new("Gauri", "Gir", "");
        animal.id = "random-id".to_string();

        assert_eq!(store.add_animal(animal).await.unwrap(), 1);
        assert_eq!(store.get_animals().await.unwrap()[0].id, "Gauri");
    }
}
