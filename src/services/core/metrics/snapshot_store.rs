// Synthetic Snapshot Store - admin-authored full metric vectors.
//
// One snapshot per (seller, timeframe), written only through the admin
// surface and read by the resolution engine. No value-range validation
// here beyond shape; range checks belong to the override store, which is
// the user-facing write path for individual metrics.

use crate::types::{MetricVector, SyntheticSnapshot, Timeframe};
use crate::utils::ShopResult;

#[async_trait::async_trait(?Send)]
pub trait SnapshotStore {
    /// Snapshot for one (seller, timeframe), if any
    async fn get(
        &self,
        seller_id: &str,
        timeframe: Timeframe,
    ) -> ShopResult<Option<SyntheticSnapshot>>;

    /// Every snapshot the seller has, across all timeframes. The engine
    /// uses this to decide the legacy-blob fallback with a single lookup.
    async fn get_all(&self, seller_id: &str) -> ShopResult<Vec<SyntheticSnapshot>>;

    /// Idempotent upsert on the (seller_id, timeframe) unique key
    async fn upsert(
        &self,
        seller_id: &str,
        timeframe: Timeframe,
        vector: MetricVector,
    ) -> ShopResult<SyntheticSnapshot>;

    /// Delete one timeframe's snapshot, or all of the seller's snapshots
    /// when `timeframe` is None
    async fn delete(&self, seller_id: &str, timeframe: Option<Timeframe>) -> ShopResult<()>;
}
