//! Milk sales module - buyers, sales and payments.

mod sales_model;
mod sales_traits;

pub use sales_model::{Buyer, BuyerBalance, EntryType, MilkSale, Payment};
pub use sales_traits::{BuyerRepositoryTrait, MilkSaleRepositoryTrait, PaymentRepositoryTrait};
