//! In-memory `FarmStore` for service tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{remove_where, replace_first, FarmStore};
use crate::errors::{Error, Result, StorageError};
use crate::expenses::{Expense, ExpenseRepositoryTrait};
use crate::livestock::{Animal, AnimalEvent, AnimalEventRepositoryTrait, AnimalRepositoryTrait};
use crate::production::{DailyYield, DailyYieldRepositoryTrait};
use crate::sales::{
    Buyer, BuyerRepositoryTrait, MilkSale, MilkSaleRepositoryTrait, Payment,
    PaymentRepositoryTrait,
};

#[derive(Default)]
pub(crate) struct MockFarmStore {
    pub expenses: Mutex<Vec<Expense>>,
    pub buyers: Mutex<Vec<Buyer>>,
    pub milk_sales: Mutex<Vec<MilkSale>>,
    pub daily_yields: Mutex<Vec<DailyYield>>,
    pub payments: Mutex<Vec<Payment>>,
    pub animals: Mutex<Vec<Animal>>,
    pub animal_events: Mutex<Vec<AnimalEvent>>,
    pub fail_expense_writes: AtomicBool,
}

impl MockFarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_expense_writes(self) -> Self {
        self.fail_expense_writes.store(true, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl ExpenseRepositoryTrait for MockFarmStore {
    async fn get_expenses(&self) -> Result<Vec<Expense>> {
        Ok(self.expenses.lock().unwrap().clone())
    }

    async fn add_expense(&self, expense: Expense) -> Result<usize> {
        if self.fail_expense_writes.load(Ordering::SeqCst) {
            return Err(Error::Storage(StorageError::Remote(
                "quota exceeded".to_string(),
            )));
        }
        self.expenses.lock().unwrap().push(expense);
        Ok(1)
    }

    async fn update_expense(&self, expense: Expense) -> Result<usize> {
        let id = expense.id.clone();
        Ok(replace_first(
            &mut self.expenses.lock().unwrap(),
            expense,
            |e: &Expense| e.id == id,
        ))
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<usize> {
        Ok(remove_where(&mut self.expenses.lock().unwrap(), |e: &Expense| {
            e.id == expense_id
        }))
    }
}

#[async_trait]
impl BuyerRepositoryTrait for MockFarmStore {
    async fn get_buyers(&self) -> Result<Vec<Buyer>> {
        Ok(self.buyers.lock().unwrap().clone())
    }

    async fn add_buyer(&self, buyer: Buyer) -> Result<usize> {
        let mut buyers = self.buyers.lock().unwrap();
        if buyers.iter().any(|b| b.name == buyer.name) {
            return Ok(0);
        }
        buyers.push(buyer);
        Ok(1)
    }

    async fn update_buyer(&self, buyer_name: &str, new_rate: f64) -> Result<usize> {
        let mut buyers = self.buyers.lock().unwrap();
        let mut updated = 0;
        for buyer in buyers.iter_mut().filter(|b| b.name == buyer_name) {
            buyer.default_rate = new_rate;
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete_buyer(&self, buyer_name: &str) -> Result<usize> {
        Ok(remove_where(&mut self.buyers.lock().unwrap(), |b: &Buyer| {
            b.name == buyer_name
        }))
    }
}

#[async_trait]
impl MilkSaleRepositoryTrait for MockFarmStore {
    async fn get_milk_sales(&self) -> Result<Vec<MilkSale>> {
        Ok(self.milk_sales.lock().unwrap().clone())
    }

    async fn add_milk_sale(&self, sale: MilkSale) -> Result<usize> {
        self.milk_sales.lock().unwrap().push(sale);
        Ok(1)
    }

    async fn update_milk_sale(&self, sale: MilkSale) -> Result<usize> {
        let id = sale.id.clone();
        Ok(replace_first(
            &mut self.milk_sales.lock().unwrap(),
            sale,
            |s: &MilkSale| s.id == id,
        ))
    }

    async fn delete_milk_sale(&self, sale_id: &str) -> Result<usize> {
        Ok(remove_where(&mut self.milk_sales.lock().unwrap(), |s: &MilkSale| {
            s.id == sale_id
        }))
    }
}

#[async_trait]
impl DailyYieldRepositoryTrait for MockFarmStore {
    async fn get_daily_yields(&self) -> Result<Vec<DailyYield>> {
        Ok(self.daily_yields.lock().unwrap().clone())
    }

    async fn add_daily_yield(&self, yield_record: DailyYield) -> Result<usize> {
        self.daily_yields.lock().unwrap().push(yield_record);
        Ok(1)
    }

    async fn update_daily_yield(&self, yield_record: DailyYield) -> Result<usize> {
        let id = yield_record.id.clone();
        Ok(replace_first(
            &mut self.daily_yields.lock().unwrap(),
            yield_record,
            |y: &DailyYield| y.id == id,
        ))
    }

    async fn delete_daily_yield(&self, yield_id: &str) -> Result<usize> {
        Ok(remove_where(&mut self.daily_yields.lock().unwrap(), |y: &DailyYield| {
            y.id == yield_id
        }))
    }
}

#[async_trait]
impl PaymentRepositoryTrait for MockFarmStore {
    async fn get_payments(&self) -> Result<Vec<Payment>> {
        Ok(self.payments.lock().unwrap().clone())
    }

    async fn add_payment(&self, payment: Payment) -> Result<usize> {
        self.payments.lock().unwrap().push(payment);
        Ok(1)
    }

    async fn update_payment(&self, payment: Payment) -> Result<usize> {
        let id = payment.id.clone();
        Ok(replace_first(
            &mut self.payments.lock().unwrap(),
            payment,
            |p: &Payment| p.id == id,
        ))
    }

    async fn delete_payment(&self, payment_id: &str) -> Result<usize> {
        Ok(remove_where(&mut self.payments.lock().unwrap(), |p: &Payment| {
            p.id == payment_id
        }))
    }
}

#[async_trait]
impl AnimalRepositoryTrait for MockFarmStore {
    async fn get_animals(&self) -> Result<Vec<Animal>> {
        Ok(self.animals.lock().unwrap().clone())
    }

    async fn add_animal(&self, animal: Animal) -> Result<usize> {
        let mut animals = self.animals.lock().unwrap();
        if animals.iter().any(|a| a.name == animal.name) {
            return Ok(0);
        }
        animals.push(animal.normalized());
        Ok(1)
    }

    async fn update_animal(&self, animal: Animal) -> Result<usize> {
        animal.ensure_name_is_key()?;
        let id = animal.id.clone();
        Ok(replace_first(
            &mut self.animals.lock().unwrap(),
            animal,
            |a: &Animal| a.id == id,
        ))
    }

    async fn delete_animal(&self, animal_id: &str) -> Result<usize> {
        Ok(remove_where(&mut self.animals.lock().unwrap(), |a: &Animal| {
            a.id == animal_id
        }))
    }
}

#[async_trait]
impl AnimalEventRepositoryTrait for MockFarmStore {
    async fn get_animal_events(&self) -> Result<Vec<AnimalEvent>> {
        Ok(self.animal_events.lock().unwrap().clone())
    }

    async fn add_animal_event(&self, event: AnimalEvent) -> Result<usize> {
        self.animal_events.lock().unwrap().push(event);
        Ok(1)
    }

    async fn update_animal_event(&self, event: AnimalEvent) -> Result<usize> {
        let id = event.id.clone();
        Ok(replace_first(
            &mut self.animal_events.lock().unwrap(),
            event,
            |e: &AnimalEvent| e.id == id,
        ))
    }

    async fn delete_animal_event(&self, event_id: &str) -> Result<usize> {
        Ok(remove_where(&mut self.animal_events.lock().unwrap(), |e: &AnimalEvent| {
            e.id == event_id
        }))
    }
}

impl FarmStore for MockFarmStore {
    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
