use async_trait::async_trait;

use super::production_model::DailyYield;
use crate::errors::Result;

/// Persistence contract for daily yield records, keyed by id.
#[async_trait]
pub trait DailyYieldRepositoryTrait: Send + Sync {
    async fn get_daily_yields(&self) -> Result<Vec<DailyYield>>;
    async fn add_daily_yield(&self, yield_record: DailyYield) -> Result<usize>;
    async fn update_daily_yield(&self, yield_record: DailyYield) -> Result<usize>;
    async fn delete_daily_yield(&self, yield_id: &str) -> Result<usize>;
}
