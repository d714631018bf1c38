use async_trait::async_trait;

use super::sales_model::{Buyer, MilkSale, Payment};
use crate::errors::Result;

/// Persistence contract for buyers.
///
/// Buyers are keyed by name rather than id.
#[async_trait]
pub trait BuyerRepositoryTrait: Send + Sync {
    async fn get_buyers(&self) -> Result<Vec<Buyer>>;

    /// Adds the buyer unless one with the same name exists, in which case
    /// nothing is written and `Ok(0)` is returned.
    async fn add_buyer(&self, buyer: Buyer) -> Result<usize>;

    /// Sets `default_rate` on every buyer named `buyer_name`.
    async fn update_buyer(&self, buyer_name: &str, new_rate: f64) -> Result<usize>;

    /// Removes every buyer named `buyer_name`.
    async fn delete_buyer(&self, buyer_name: &str) -> Result<usize>;
}

/// Persistence contract for milk sales, keyed by id.
#[async_trait]
pub trait MilkSaleRepositoryTrait: Send + Sync {
    async fn get_milk_sales(&self) -> Result<Vec<MilkSale>>;
    async fn add_milk_sale(&self, sale: MilkSale) -> Result<usize>;
    async fn update_milk_sale(&self, sale: MilkSale) -> Result<usize>;
    async fn delete_milk_sale(&self, sale_id: &str) -> Result<usize>;
}

/// Persistence contract for payments and advances, keyed by id.
#[async_trait]
pub trait PaymentRepositoryTrait: Send + Sync {
    async fn get_payments(&self) -> Result<Vec<Payment>>;
    async fn add_payment(&self, payment: Payment) -> Result<usize>;
    async fn update_payment(&self, payment: Payment) -> Result<usize>;
    async fn delete_payment(&self, payment_id: &str) -> Result<usize>;
}
