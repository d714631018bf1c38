//! Milk production module.

mod production_model;
mod production_traits;

pub use production_model::{DailyYield, YieldTotal};
pub use production_traits::DailyYieldRepositoryTrait;
