//! In-memory worksheet cache with TTL using moka

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use dairy_core::store::Collection;

use crate::codec::RawRow;

/// Fetched rows per collection, valid for a fixed time-to-live.
///
/// Entries are only inserted after a successful fetch. Mutations drop the
/// entry of the collection they touched.
#[derive(Clone)]
pub struct RecordCache {
    rows: Cache<Collection, Arc<Vec<RawRow>>>,
    ttl: Duration,
}

impl RecordCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            rows: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(32)
                .build(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get(&self, collection: Collection) -> Option<Arc<Vec<RawRow>>> {
        self.rows.get(&collection).await
    }

    pub async fn insert(&self, collection: Collection, rows: Arc<Vec<RawRow>>) {
        self.rows.insert(collection, rows).await;
    }

    pub async fn invalidate(&self, collection: Collection) {
        self.rows.invalidate(&collection).await;
    }

    pub fn clear(&self) {
        self.rows.invalidate_all();
    }
}
